//! Geometric properties every transform must hold, plus the error each
//! kind of under-specified input produces.

use helio_coords::{
    Coordinate, CoordData, Frame, FrameKind, ObsTime, Observer, TransformConfig, TransformError,
    TransformGraph,
};
use helio_ephem::{EphemerisConfig, AU_KM};
use helio_frames::vector::{norm, sub};
use helio_frames::Vec3;
use helio_time::Epoch;

const P: Vec3 = [1.1e8, -4.0e7, 2.5e7];
const Q: Vec3 = [-3.0e7, 9.0e7, -1.2e7];

fn graph() -> TransformGraph {
    TransformGraph::analytic(EphemerisConfig::default(), TransformConfig::default())
        .expect("analytic graph")
}

fn t0() -> Epoch {
    Epoch::from_utc(2013, 4, 1, 0, 0, 0.0)
}

fn observer(t: Epoch) -> Observer {
    let hgs = Frame::at(FrameKind::HeliographicStonyhurst, t).unwrap();
    Observer::at(Coordinate::from_spherical(hgs, -20.0, 3.0, 0.9 * AU_KM).unwrap()).unwrap()
}

fn frame(kind: FrameKind, t: Epoch) -> Frame {
    let mut frame = Frame::new(kind);
    if kind.has_obstime() {
        frame = frame.with_obstime(t).unwrap();
    }
    if kind.has_observer() {
        frame = frame.with_observer(observer(t)).unwrap();
    }
    frame
}

fn pair(kind: FrameKind, t: Epoch) -> Coordinate {
    Coordinate::new(frame(kind, t), CoordData::cartesian(vec![P, Q]).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn transforms_are_rigid_motions() {
    // Separations survive every transform, so each rotation is orthonormal.
    let g = graph();
    let want = norm(&sub(&P, &Q));
    for a in FrameKind::ALL {
        for b in FrameKind::ALL {
            let out = g.transform(&pair(a, t0()), &frame(b, t0())).unwrap();
            let xyz = out.cartesian();
            let got = norm(&sub(&xyz[0], &xyz[1]));
            assert!((got - want).abs() < 1e-6, "{a} -> {b}: {got} vs {want}");
        }
    }
}

#[test]
fn same_frame_is_bit_identical() {
    let g = graph();
    for kind in FrameKind::ALL {
        let coord = pair(kind, t0());
        let out = g.transform(&coord, coord.frame()).unwrap();
        assert_eq!(out.cartesian(), coord.cartesian(), "{kind}");
        assert_eq!(out.frame(), coord.frame());
    }
}

#[test]
fn rotation_only_edges_keep_distance_from_origin() {
    let g = graph();
    let t = t0();
    for (a, b) in [
        (FrameKind::Hcrs, FrameKind::HeliographicStonyhurst),
        (FrameKind::HeliographicStonyhurst, FrameKind::HeliographicCarrington),
        (FrameKind::Hcrs, FrameKind::HeliocentricInertial),
        (FrameKind::HeliocentricMeanEcliptic, FrameKind::HeliocentricEarthEcliptic),
    ] {
        let out = g.transform(&pair(a, t), &frame(b, t)).unwrap();
        for (got, want) in out.cartesian().iter().zip([P, Q]) {
            let (r1, r0) = (norm(got), norm(&want));
            assert!((r1 - r0).abs() < 1e-12 * r0, "{a} -> {b}");
        }
    }
}

#[test]
fn gse_flips_sun_direction_to_plus_x() {
    let g = graph();
    let t = t0();
    let sun = Coordinate::from_cartesian(frame(FrameKind::Hcrs, t), [0.0; 3]).unwrap();
    let gse = g.transform(&sun, &frame(FrameKind::GeocentricSolarEcliptic, t)).unwrap();
    let xyz = gse.cartesian()[0];
    let d = helio_coords::earth_distance(&g, t).unwrap();
    assert!((xyz[0] - d).abs() < 1e-3, "x = {}, |sun-earth| = {d}", xyz[0]);
    assert!(xyz[1].abs() < 1e-3 && xyz[2].abs() < 1e-3, "{xyz:?}");
}

#[test]
fn stonyhurst_meridian_points_at_earth() {
    let g = graph();
    let t = t0();
    let earth = helio_coords::get_earth(&g, &ObsTime::from(t)).unwrap();
    let hee = g.transform(&earth, &frame(FrameKind::HeliocentricEarthEcliptic, t)).unwrap();
    let s = hee.spherical()[0];
    assert!(s.lon_deg.abs() < 1e-9 && s.lat_deg.abs() < 1e-9, "{s:?}");
}

// ---------------------------------------------------------------------------
// Velocities
// ---------------------------------------------------------------------------

#[test]
fn fixed_stonyhurst_point_drifts_in_carrington() {
    // A point at rest in HGS moves at the synodic rate (~13.2°/day) in HGC.
    let g = graph();
    let t = t0();
    let rsun = helio_coords::sun::RSUN_KM;
    let data = CoordData::cartesian(vec![[rsun, 0.0, 0.0]])
        .unwrap()
        .with_velocities(vec![[0.0; 3]])
        .unwrap();
    let hgs = Coordinate::new(frame(FrameKind::HeliographicStonyhurst, t), data).unwrap();
    let hgc = g.transform(&hgs, &frame(FrameKind::HeliographicCarrington, t)).unwrap();

    let v = hgc.velocities().expect("velocities propagated")[0];
    let expected = rsun * 13.2_f64.to_radians() / 86_400.0;
    assert!((norm(&v) - expected).abs() < 0.05 * expected, "|v| = {}", norm(&v));

    let states = hgc.spherical_states().unwrap();
    assert!((states[0].lon_speed + 13.2).abs() < 0.5, "{}", states[0].lon_speed);
}

#[test]
fn same_frame_keeps_velocities() {
    let g = graph();
    let t = t0();
    let data = CoordData::cartesian(vec![P])
        .unwrap()
        .with_velocities(vec![[1.0, -2.0, 0.5]])
        .unwrap();
    let hgs = Coordinate::new(frame(FrameKind::HeliographicStonyhurst, t), data).unwrap();
    let same = g.transform(&hgs, hgs.frame()).unwrap();
    assert_eq!(same.cartesian(), hgs.cartesian());
    let v = same.velocities().expect("velocities kept")[0];
    assert!(norm(&sub(&v, &[1.0, -2.0, 0.5])) < 1e-6, "{v:?}");
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

#[test]
fn missing_obstime_is_named() {
    let g = graph();
    let hgs = Coordinate::from_cartesian(Frame::new(FrameKind::HeliographicStonyhurst), P).unwrap();
    let err = g.transform(&hgs, &frame(FrameKind::Hcrs, t0())).unwrap_err();
    assert_eq!(
        err,
        TransformError::MissingAttribute {
            frame: FrameKind::HeliographicStonyhurst,
            attribute: "obstime",
        }
    );
}

#[test]
fn direction_only_helioprojective_needs_distance() {
    let g = graph();
    let hpc = Coordinate::from_lon_lat(frame(FrameKind::Helioprojective, t0()), 0.1, 0.1).unwrap();
    let err = g
        .transform(&hpc, &frame(FrameKind::HeliographicStonyhurst, t0()))
        .unwrap_err();
    assert!(matches!(err, TransformError::MissingDistance(_)), "{err}");

    // Estimating the distance first makes the transform succeed.
    let filled = hpc.calculate_distance(helio_coords::sun::RSUN_KM).unwrap();
    let on_disk = g
        .transform(&filled, &frame(FrameKind::HeliographicStonyhurst, t0()))
        .unwrap();
    let r = on_disk.spherical()[0].distance_km;
    assert!((r - helio_coords::sun::RSUN_KM).abs() < 1e-3, "r = {r}");
}

#[test]
fn token_observer_must_be_resolved() {
    let g = graph();
    let hpc_frame = Frame::at(FrameKind::Helioprojective, t0())
        .unwrap()
        .with_observer(Observer::earth())
        .unwrap();
    let hpc = Coordinate::from_spherical(hpc_frame.clone(), 0.1, 0.1, 1.4e8).unwrap();
    let err = g
        .transform(&hpc, &frame(FrameKind::HeliographicStonyhurst, t0()))
        .unwrap_err();
    assert_eq!(err, TransformError::UnresolvedObserver("earth".into()));

    let resolved = hpc_frame.resolve_observer(&g).unwrap();
    let hpc = Coordinate::from_spherical(resolved, 0.1, 0.1, 1.4e8).unwrap();
    assert!(g.transform(&hpc, &frame(FrameKind::HeliographicStonyhurst, t0())).is_ok());
}

#[test]
fn token_and_resolved_observers_are_incompatible() {
    let g = graph();
    let token_frame = Frame::at(FrameKind::Helioprojective, t0())
        .unwrap()
        .with_observer(Observer::earth())
        .unwrap();
    let hpc = Coordinate::from_spherical(token_frame, 0.1, 0.1, 1.4e8).unwrap();
    let err = g.transform(&hpc, &frame(FrameKind::Helioprojective, t0())).unwrap_err();
    assert!(matches!(err, TransformError::IncompatibleObserver { .. }), "{err}");
}

#[test]
fn attributes_are_validated_per_kind() {
    assert_eq!(
        Frame::new(FrameKind::Icrs).with_obstime(t0()).unwrap_err(),
        TransformError::InvalidAttribute {
            frame: FrameKind::Icrs,
            attribute: "obstime",
        }
    );
    assert!(matches!(
        Frame::new(FrameKind::HeliographicStonyhurst).with_observer(Observer::earth()),
        Err(TransformError::InvalidAttribute { .. })
    ));
    assert!(matches!(
        Frame::new(FrameKind::Hcrs).with_equinox(t0()),
        Err(TransformError::InvalidAttribute { .. })
    ));
}
