use anyhow::Context;
use linergycore::data_interface::{FaultRecord, GeoPoint, LineRef};
use linergycore::prelude::{ReportBody, ReportContext, ReportRenderer};
use linergycore::report::{PdfRenderer, TextRenderer};
use linergycore::telemetry::{MetricsRecorder, MetricsSnapshot};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::workflow::config::DriverConfig;

/// Outcome of an offline rendering pass.
#[derive(Debug)]
pub struct RenderSummary {
    pub written: usize,
    pub degraded: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Clone)]
pub struct Runner {
    config: DriverConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Renders both artifacts for one fault and writes them under the
    /// configured output directory.
    pub fn render_fault(
        &self,
        fault: &FaultRecord,
        line: Option<&LineRef>,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let ctx = ReportContext::new(fault.clone(), line.cloned());
        let text = TextRenderer::new();
        let pdf = PdfRenderer::new();
        let renderers: [&dyn ReportRenderer; 2] = [&text, &pdf];

        fs::create_dir_all(&self.config.out_dir).with_context(|| {
            format!(
                "creating report directory {}",
                self.config.out_dir.display()
            )
        })?;

        let mut written = Vec::new();
        for renderer in renderers {
            let artifact = match renderer.render(&ctx) {
                Ok(artifact) => artifact,
                Err(err) => {
                    self.metrics.record_error();
                    return Err(err).context(format!("rendering report for fault {}", fault.id));
                }
            };
            let path = self.config.out_dir.join(&artifact.filename);
            match &artifact.body {
                ReportBody::Text(text) => fs::write(&path, text),
                ReportBody::Pdf(bytes) => fs::write(&path, bytes),
            }
            .with_context(|| format!("writing report {}", path.display()))?;
            written.push(path);
        }

        self.metrics.record_rendered();
        if GeoPoint::from_geojson(fault.geom.as_ref()).is_none() {
            self.metrics.record_degraded();
        }
        Ok(written)
    }

    /// Renders the whole fault set, resolving each fault's line reference
    /// by its `linea_id`.
    pub fn render_all(
        &self,
        faults: &[FaultRecord],
        lines: &[LineRef],
    ) -> anyhow::Result<RenderSummary> {
        let mut files = Vec::new();
        for fault in faults {
            let line = fault
                .linea_id
                .as_ref()
                .and_then(|id| lines.iter().find(|l| &l.numero == id));
            files.extend(self.render_fault(fault, line)?);
        }

        let snapshot = self.metrics.snapshot();
        Ok(RenderSummary {
            written: snapshot.rendered,
            degraded: snapshot.degraded,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::sample::{build_sample_set, SampleConfig};
    use tempfile::tempdir;

    #[test]
    fn runner_writes_text_and_pdf_per_fault() {
        let dir = tempdir().unwrap();
        let config = DriverConfig::from_args(dir.path().to_path_buf(), 4, 3);
        let set = build_sample_set(&config.to_sample_config()).unwrap();

        let runner = Runner::new(config);
        let summary = runner.render_all(&set.faults, &set.lines).unwrap();

        assert_eq!(summary.written, 4);
        assert_eq!(summary.files.len(), 8);
        for path in &summary.files {
            assert!(path.exists());
        }
    }

    #[test]
    fn runner_counts_degraded_geometry() {
        let dir = tempdir().unwrap();
        let config = DriverConfig::from_args(dir.path().to_path_buf(), 5, 3);
        let set = build_sample_set(&config.to_sample_config()).unwrap();
        let missing = set.faults.iter().filter(|f| f.geom.is_none()).count();

        let runner = Runner::new(config);
        let summary = runner.render_all(&set.faults, &set.lines).unwrap();
        assert_eq!(summary.degraded, missing);
    }
}
