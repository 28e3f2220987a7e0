//! Unit tests for wf-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{GeoPoint, MetricPoint};

    #[test]
    fn origin_projects_to_origin() {
        let m = GeoPoint::new(0.0, 0.0).to_metric();
        assert!(m.x.abs() < 1e-6);
        assert!(m.y.abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        // 1° of longitude ≈ 111.3 km of Mercator x everywhere.
        let m = GeoPoint::new(0.0, 1.0).to_metric();
        assert!((m.x - 111_319.5).abs() < 1.0, "got {}", m.x);
        assert!(m.y.abs() < 1e-6);
    }

    #[test]
    fn projection_roundtrip() {
        // Ulaanbaatar city center.
        let g = GeoPoint::new(47.9188, 106.9176);
        let back = g.to_metric().to_geo();
        assert!((back.lat - g.lat).abs() < 1e-9);
        assert!((back.lon - g.lon).abs() < 1e-9);
    }

    #[test]
    fn euclidean_distance() {
        let a = MetricPoint::new(0.0, 0.0);
        let b = MetricPoint::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_sq(b), 25.0);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn grid_key_collapses_within_half_metre() {
        let a = MetricPoint::new(100.4, 200.4);
        let b = MetricPoint::new(99.6, 199.6);
        assert_eq!(a.grid_key(), b.grid_key());

        let c = MetricPoint::new(100.6, 200.4);
        assert_ne!(a.grid_key(), c.grid_key());
    }

    #[test]
    fn grid_key_negative_coordinates() {
        let a = MetricPoint::new(-0.4, -0.4);
        assert_eq!(a.grid_key(), (0, 0));
        let b = MetricPoint::new(-0.6, -0.6);
        assert_eq!(b.grid_key(), (-1, -1));
    }

    #[test]
    fn parse_latlng_pair() {
        let p: GeoPoint = "47.9188, 106.9176".parse().unwrap();
        assert_eq!(p.lat, 47.9188);
        assert_eq!(p.lon, 106.9176);
    }

    #[test]
    fn parse_rejects_malformed_and_out_of_range() {
        use crate::CoreError;

        for raw in ["", "47.9", "a,b", "1,2,3", "47.9;106.9", "91,0", "0,181"] {
            let err = raw.parse::<GeoPoint>().unwrap_err();
            assert!(matches!(err, CoreError::Parse(_)), "{raw}");
        }
        assert!("-90,-180".parse::<GeoPoint>().is_ok());
    }
}
