use chrono::{DateTime, Utc};
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        checkbox, column, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use linergycore::data_interface::{
    Classification, FaultRecord, FaultStatus, GeoPoint, LineRef, StructureRecord,
};
use linergycore::filter::{FilterPanel, FilterState};
use linergycore::notify::{Toast, ToastKind};
use linergycore::prelude::{ReportContext, ReportRenderer};
use linergycore::report::{PdfRenderer, TextRenderer};
use serde::Deserialize;
use std::time::{Duration, Instant};

fn main() -> iced::Result {
    iced::application(MapConsole::boot, MapConsole::update, MapConsole::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &MapConsole) -> String {
    "Linergy Map Console".into()
}

fn application_subscription(_: &MapConsole) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &MapConsole) -> Theme {
    Theme::Dark
}

struct MapConsole {
    panel: FilterPanel,
    payload: Option<MapPayload>,
    selected: Option<String>,
    toast: Toast,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<MapPayload, String>),
    ToggleFilterPanel,
    ToggleClassification(Classification),
    ToggleStatus(FaultStatus),
    StructuresVisibility(bool),
    FaultsVisibility(bool),
    ClearFilters,
    FaultSelected(String),
    CopyText,
    SavePdf,
    DismissToast,
}

impl MapConsole {
    fn boot() -> (Self, Task<Message>) {
        (
            MapConsole {
                panel: FilterPanel::new(),
                payload: None,
                selected: None,
                toast: Toast::new(),
                status: "Esperando datos del puente...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                state.toast.poll(Instant::now());
                Task::perform(fetch_payload(), Message::PayloadFetched)
            }
            Message::PayloadFetched(Ok(payload)) => {
                let changed = state
                    .payload
                    .as_ref()
                    .map(|previous| previous.faults.len() != payload.faults.len())
                    .unwrap_or(true);
                if changed {
                    state.push_history(format!(
                        "Datos: {} fallas / {} estructuras",
                        payload.faults.len(),
                        payload.structures.len()
                    ));
                }
                state.status = format!(
                    "Datos recibidos: {} fallas / {} estructuras",
                    payload.faults.len(),
                    payload.structures.len()
                );
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Error del puente de datos: {err}");
                Task::none()
            }
            Message::ToggleFilterPanel => {
                state.panel.toggle_expanded();
                Task::none()
            }
            Message::ToggleClassification(classification) => {
                state.panel.toggle_classification(classification);
                Task::none()
            }
            Message::ToggleStatus(status) => {
                state.panel.toggle_status(status);
                Task::none()
            }
            Message::StructuresVisibility(visible) => {
                state.panel.set_structures_visible(visible);
                Task::none()
            }
            Message::FaultsVisibility(visible) => {
                state.panel.set_faults_visible(visible);
                Task::none()
            }
            Message::ClearFilters => {
                state.panel.clear_all();
                Task::none()
            }
            Message::FaultSelected(id) => {
                state.selected = Some(id);
                Task::none()
            }
            Message::CopyText => {
                let Some((fault, line)) = state.selected_fault() else {
                    return Task::none();
                };
                let ctx = ReportContext::new(fault.clone(), line.cloned());
                match TextRenderer::new().render(&ctx) {
                    Ok(artifact) => {
                        let body = artifact.as_text().unwrap_or_default().to_string();
                        state.toast.show(
                            "Reporte copiado al portapapeles",
                            ToastKind::Success,
                            Instant::now(),
                        );
                        state.push_history(format!("Texto copiado ({})", artifact.filename));
                        iced::clipboard::write(body)
                    }
                    Err(err) => {
                        state
                            .toast
                            .show(format!("Error al copiar: {err}"), ToastKind::Error, Instant::now());
                        Task::none()
                    }
                }
            }
            Message::SavePdf => {
                let Some((fault, line)) = state.selected_fault() else {
                    return Task::none();
                };
                let ctx = ReportContext::new(fault.clone(), line.cloned());
                match PdfRenderer::new()
                    .render(&ctx)
                    .map_err(|err| err.to_string())
                    .and_then(|artifact| {
                        std::fs::write(&artifact.filename, artifact.as_bytes())
                            .map(|_| artifact.filename.clone())
                            .map_err(|err| err.to_string())
                    }) {
                    Ok(filename) => {
                        state.toast.show(
                            format!("PDF guardado: {filename}"),
                            ToastKind::Success,
                            Instant::now(),
                        );
                        state.push_history(format!("PDF guardado ({filename})"));
                    }
                    Err(err) => {
                        state.toast.show(
                            format!("Error al guardar PDF: {err}"),
                            ToastKind::Error,
                            Instant::now(),
                        );
                    }
                }
                Task::none()
            }
            Message::DismissToast => {
                state.toast.dismiss();
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let filters = state.panel.state().clone();

        let panel_column = state.filter_column(&filters);
        let map_column = state.map_column(&filters);

        let layout = row![panel_column, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn filter_column(&self, filters: &FilterState) -> Element<'_, Message> {
        let count = filters.active_filter_count();
        let header_label = if count > 0 {
            format!("Filtros ({count})")
        } else {
            "Filtros".to_string()
        };
        let hint = if self.panel.is_expanded() {
            "Contraer filtros"
        } else {
            "Expandir filtros"
        };

        let mut panel = column![
            text("Filtros del mapa").size(26),
            button(text(header_label).size(14))
                .on_press(Message::ToggleFilterPanel)
                .padding(8),
            text(hint).size(12),
        ]
        .spacing(10);

        if self.panel.is_expanded() {
            if count > 0 {
                panel = panel.push(
                    button(text("Limpiar todos los filtros").size(12))
                        .on_press(Message::ClearFilters)
                        .padding(6),
                );
            }

            panel = panel.push(text("Clasificación").size(14));
            let mut classification_row = row![].spacing(6);
            for classification in Classification::ALL {
                classification_row = classification_row.push(chip(
                    classification.label(),
                    filters.classifications.contains(&classification),
                    Message::ToggleClassification(classification),
                ));
            }
            panel = panel.push(classification_row);

            panel = panel.push(text("Estado").size(14));
            let mut status_row = row![].spacing(6);
            for status in FaultStatus::ALL {
                status_row = status_row.push(chip(
                    status.label(),
                    filters.statuses.contains(&status),
                    Message::ToggleStatus(status),
                ));
            }
            panel = panel.push(status_row);

            panel = panel.push(text("Visibilidad").size(14));
            panel = panel.push(
                checkbox(filters.show_structures)
                    .label("Estructuras")
                    .on_toggle(Message::StructuresVisibility),
            );
            panel = panel
                .push(checkbox(filters.show_faults).label("Fallas").on_toggle(Message::FaultsVisibility));
        }

        panel = panel.push(text("Fallas reportadas").size(16));
        let fault_list = if let Some(payload) = &self.payload {
            payload.faults.iter().fold(
                Column::new().spacing(4),
                |col, fault| {
                    let label = format!(
                        "{} · {} · {}",
                        fault.folio(),
                        fault.tipo,
                        linergycore::data_interface::status_label(&fault.estado)
                    );
                    col.push(
                        button(text(label).size(12))
                            .on_press(Message::FaultSelected(fault.id.clone()))
                            .padding(4),
                    )
                },
            )
        } else {
            Column::new().push(text("Sin datos todavía").size(12))
        };
        panel = panel.push(scrollable(fault_list).height(Length::Fixed(180.0)));

        if let Some((fault, line)) = self.selected_fault() {
            panel = panel.push(self.detail_block(fault, line));
        }

        panel.padding(16).width(Length::Fixed(360.0)).into()
    }

    fn detail_block(&self, fault: &FaultRecord, line: Option<&LineRef>) -> Element<'_, Message> {
        let line_text = line
            .map(|l| match &l.nombre {
                Some(nombre) => format!("{} - {}", l.numero, nombre),
                None => l.numero.clone(),
            })
            .unwrap_or_else(|| "N/A".to_string());
        let coords_text = GeoPoint::from_geojson(fault.geom.as_ref())
            .map(|p| p.coords_text())
            .unwrap_or_else(|| "No disponible".to_string());

        column![
            text(format!("Folio {}", fault.folio())).size(16),
            text(format!("Línea: {line_text}")).size(12),
            text(format!(
                "Estado: {}",
                linergycore::data_interface::status_label(&fault.estado)
            ))
            .size(12),
            text(format!("Ocurrencia: {}", format_ts(&fault.ocurrencia_ts))).size(12),
            text(format!("Coordenadas: {coords_text}")).size(12),
            row![
                button(text("Copiar texto").size(12))
                    .on_press(Message::CopyText)
                    .padding(6),
                button(text("Guardar PDF").size(12))
                    .on_press(Message::SavePdf)
                    .padding(6),
            ]
            .spacing(8),
        ]
        .spacing(4)
        .into()
    }

    fn map_column(&self, filters: &FilterState) -> Element<'_, Message> {
        let (fault_markers, structure_markers) = self.visible_markers(filters);

        let map_canvas = Canvas::new(FaultMap {
            faults: fault_markers.clone(),
            structures: structure_markers.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(380.0));

        let mut map_col = column![text("Mapa de fallas").size(26), text(&self.status).size(14)]
            .spacing(10);

        if self.toast.is_visible() {
            let toast_color = match self.toast.kind() {
                ToastKind::Success => Color::from_rgb(0.35, 0.78, 0.5),
                ToastKind::Error => Color::from_rgb(0.9, 0.4, 0.4),
                ToastKind::Info => Color::from_rgb(0.45, 0.65, 0.95),
            };
            map_col = map_col.push(
                row![
                    text(self.toast.message().to_string())
                        .size(14)
                        .color(toast_color),
                    button(text("X").size(12))
                        .on_press(Message::DismissToast)
                        .padding(4),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
        }

        map_col = map_col.push(map_canvas);
        map_col = map_col.push(
            text(format!(
                "Visibles: {} fallas / {} estructuras",
                fault_markers.len(),
                structure_markers.len()
            ))
            .size(14),
        );

        let history_list = if self.history.is_empty() {
            Column::new().push(text("Sin actividad todavía").size(12))
        } else {
            self.history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };
        map_col = map_col.push(text("Actividad").size(16));
        map_col = map_col.push(
            Container::new(scrollable(history_list).height(Length::Fixed(110.0))).padding(6),
        );

        map_col.padding(16).width(Length::Fill).into()
    }

    /// Faults without a valid point are never plotted; there is no origin
    /// fallback on the map either.
    fn visible_markers(&self, filters: &FilterState) -> (Vec<FaultMarker>, Vec<GeoPoint>) {
        let Some(payload) = &self.payload else {
            return (Vec::new(), Vec::new());
        };

        let faults = payload
            .faults
            .iter()
            .filter(|fault| filters.matches_fault(fault))
            .filter_map(|fault| {
                GeoPoint::from_geojson(fault.geom.as_ref()).map(|point| FaultMarker {
                    point,
                    status: FaultStatus::parse(&fault.estado),
                })
            })
            .collect();

        let structures = payload
            .structures
            .iter()
            .filter(|structure| filters.matches_structure(structure))
            .filter_map(|structure| GeoPoint::from_geojson(structure.geom.as_ref()))
            .collect();

        (faults, structures)
    }

    fn selected_fault(&self) -> Option<(&FaultRecord, Option<&LineRef>)> {
        let payload = self.payload.as_ref()?;
        let id = self.selected.as_ref()?;
        let fault = payload.faults.iter().find(|fault| &fault.id == id)?;
        let line = fault
            .linea_id
            .as_ref()
            .and_then(|id| payload.lines.iter().find(|line| &line.numero == id));
        Some((fault, line))
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn chip(label: &str, selected: bool, message: Message) -> Element<'_, Message> {
    let marker = if selected { "●" } else { "○" };
    button(text(format!("{marker} {label}")).size(12))
        .on_press(message)
        .padding(6)
        .into()
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

async fn fetch_payload() -> Result<MapPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/faults")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<MapPayload>()
        .await
        .map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Deserialize)]
struct MapPayload {
    #[serde(default)]
    faults: Vec<FaultRecord>,
    #[serde(default)]
    structures: Vec<StructureRecord>,
    #[serde(default)]
    lines: Vec<LineRef>,
}

#[derive(Debug, Clone)]
struct FaultMarker {
    point: GeoPoint,
    status: Option<FaultStatus>,
}

#[derive(Clone)]
struct FaultMap {
    faults: Vec<FaultMarker>,
    structures: Vec<GeoPoint>,
}

impl FaultMap {
    fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let points = self
            .faults
            .iter()
            .map(|marker| marker.point)
            .chain(self.structures.iter().copied());

        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut any = false;
        for point in points {
            any = true;
            min_lat = min_lat.min(point.lat);
            max_lat = max_lat.max(point.lat);
            min_lon = min_lon.min(point.lon);
            max_lon = max_lon.max(point.lon);
        }
        if !any {
            return None;
        }

        // Pad so single points and straight lines stay visible.
        let lat_pad = ((max_lat - min_lat) * 0.1).max(0.01);
        let lon_pad = ((max_lon - min_lon) * 0.1).max(0.01);
        Some((
            min_lat - lat_pad,
            max_lat + lat_pad,
            min_lon - lon_pad,
            max_lon + lon_pad,
        ))
    }
}

impl canvas::Program<Message> for FaultMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.03, 0.05, 0.04),
        );

        let grid = Path::new(|builder| {
            for step in 1..4 {
                let x = bounds.width * (step as f32 / 4.0);
                let y = bounds.height * (step as f32 / 4.0);
                builder.move_to(Point::new(x, 0.0));
                builder.line_to(Point::new(x, bounds.height));
                builder.move_to(Point::new(0.0, y));
                builder.line_to(Point::new(bounds.width, y));
            }
        });
        frame.stroke(
            &grid,
            Stroke::default()
                .with_color(Color::from_rgb(0.16, 0.2, 0.18))
                .with_width(1.0),
        );

        let Some((min_lat, max_lat, min_lon, max_lon)) = self.bounds() else {
            return vec![frame.into_geometry()];
        };

        let project = |point: &GeoPoint| {
            let x = ((point.lon - min_lon) / (max_lon - min_lon)) as f32 * bounds.width;
            let y = (1.0 - ((point.lat - min_lat) / (max_lat - min_lat)) as f32) * bounds.height;
            Point::new(x, y)
        };

        for structure in &self.structures {
            let center = project(structure);
            let size = 5.0;
            let square = Path::rectangle(
                Point::new(center.x - size / 2.0, center.y - size / 2.0),
                iced::Size::new(size, size),
            );
            frame.fill(&square, Color::from_rgb(0.55, 0.58, 0.6));
        }

        for marker in &self.faults {
            let color = match marker.status {
                Some(FaultStatus::Abierta) => Color::from_rgb(0.92, 0.35, 0.3),
                Some(FaultStatus::EnAtencion) => Color::from_rgb(0.95, 0.7, 0.25),
                Some(FaultStatus::Cerrada) => Color::from_rgb(0.3, 0.75, 0.45),
                None => Color::from_rgb(0.6, 0.6, 0.65),
            };
            let dot = Path::new(|builder| builder.circle(project(&marker.point), 5.0));
            frame.fill(&dot, color);
        }

        vec![frame.into_geometry()]
    }
}
