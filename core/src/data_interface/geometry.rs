use serde_json::Value;

/// Validated point coordinate decoded from a stored geometry value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Decodes a GeoJSON-like `{type: "Point", coordinates: [lon, lat]}`
    /// value.
    ///
    /// Anything that is not a well-formed, in-range point yields `None`.
    /// Callers must render that as "location unavailable" instead of
    /// substituting an origin coordinate, which would place an incident off
    /// the coast of Africa.
    pub fn from_geojson(geom: Option<&Value>) -> Option<GeoPoint> {
        let geom = geom?;
        if geom.get("type")?.as_str()? != "Point" {
            return None;
        }
        let coords = geom.get("coordinates")?.as_array()?;
        if coords.len() < 2 {
            return None;
        }
        let lon = coords[0].as_f64()?;
        let lat = coords[1].as_f64()?;
        if !is_valid_lat_lon(lat, lon) {
            return None;
        }
        Some(GeoPoint { lat, lon })
    }

    /// `"lat, lon"` to six decimals, the form used by both report bodies.
    pub fn coords_text(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lon)
    }

    pub fn maps_url(&self) -> String {
        format!("https://www.google.com/maps?q={},{}", self.lat, self.lon)
    }
}

fn is_valid_lat_lon(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_valid_point() {
        let geom = json!({"type": "Point", "coordinates": [-99.1, 19.4]});
        let point = GeoPoint::from_geojson(Some(&geom)).unwrap();
        assert_eq!(point.lat, 19.4);
        assert_eq!(point.lon, -99.1);
    }

    #[test]
    fn rejects_absent_geometry() {
        assert_eq!(GeoPoint::from_geojson(None), None);
        assert_eq!(GeoPoint::from_geojson(Some(&Value::Null)), None);
    }

    #[test]
    fn rejects_non_point_types() {
        let geom = json!({"type": "LineString", "coordinates": [[-99.1, 19.4], [-99.2, 19.5]]});
        assert_eq!(GeoPoint::from_geojson(Some(&geom)), None);
    }

    #[test]
    fn rejects_malformed_coordinate_arrays() {
        let short = json!({"type": "Point", "coordinates": [-99.1]});
        assert_eq!(GeoPoint::from_geojson(Some(&short)), None);

        let strings = json!({"type": "Point", "coordinates": ["-99.1", "19.4"]});
        assert_eq!(GeoPoint::from_geojson(Some(&strings)), None);

        let missing = json!({"type": "Point"});
        assert_eq!(GeoPoint::from_geojson(Some(&missing)), None);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad_lat = json!({"type": "Point", "coordinates": [-99.1, 94.2]});
        assert_eq!(GeoPoint::from_geojson(Some(&bad_lat)), None);

        let bad_lon = json!({"type": "Point", "coordinates": [-190.0, 19.4]});
        assert_eq!(GeoPoint::from_geojson(Some(&bad_lon)), None);
    }

    #[test]
    fn accepts_boundary_values() {
        let geom = json!({"type": "Point", "coordinates": [-180.0, 90.0]});
        let point = GeoPoint::from_geojson(Some(&geom)).unwrap();
        assert_eq!(point.coords_text(), "90.000000, -180.000000");
    }

    #[test]
    fn maps_url_uses_short_decimal_form() {
        let point = GeoPoint {
            lat: 19.4,
            lon: -99.1,
        };
        assert_eq!(point.maps_url(), "https://www.google.com/maps?q=19.4,-99.1");
    }
}
