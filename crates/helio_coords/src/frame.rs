//! Frame kinds, their attribute sets, and frame values.
//!
//! A [`Frame`] is a kind tag plus the attributes that kind defines:
//!
//! | Kind | obstime | observer | equinox |
//! |------|---------|----------|---------|
//! | ICRS | — | — | — |
//! | HCRS | J2000 default | — | — |
//! | HME  | J2000 default | — | J2000 default |
//! | HGS, HGC, HEE, GSE, HCI, GEI | optional | — | — |
//! | HCC, HPC | optional | optional | — |
//!
//! Setting an attribute a kind does not define is rejected at construction.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use helio_frames::vector::{broadcast_get, broadcast_len};
use helio_time::Epoch;

use crate::coordinate::Coordinate;
use crate::error::TransformError;
use crate::graph::TransformGraph;
use crate::observer::{self, Observer};

/// Supported coordinate frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameKind {
    /// International Celestial Reference System (barycentric).
    Icrs,
    /// ICRS axes with the origin at the Sun.
    Hcrs,
    /// Sun-centred, mean ecliptic and equinox of a date.
    HeliocentricMeanEcliptic,
    /// Heliographic Stonyhurst.
    HeliographicStonyhurst,
    /// Heliographic Carrington.
    HeliographicCarrington,
    /// Heliocentric Cartesian (observer-oriented).
    Heliocentric,
    /// Helioprojective (observer-centred angles on the sky).
    Helioprojective,
    /// Heliocentric Earth Ecliptic.
    HeliocentricEarthEcliptic,
    /// Geocentric Solar Ecliptic.
    GeocentricSolarEcliptic,
    /// Heliocentric Inertial.
    HeliocentricInertial,
    /// Geocentric Earth Equatorial.
    GeocentricEarthEquatorial,
}

impl FrameKind {
    pub const ALL: [Self; 11] = [
        Self::Icrs,
        Self::Hcrs,
        Self::HeliocentricMeanEcliptic,
        Self::HeliographicStonyhurst,
        Self::HeliographicCarrington,
        Self::Heliocentric,
        Self::Helioprojective,
        Self::HeliocentricEarthEcliptic,
        Self::GeocentricSolarEcliptic,
        Self::HeliocentricInertial,
        Self::GeocentricEarthEquatorial,
    ];

    /// Registry name (lowercase).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Icrs => "icrs",
            Self::Hcrs => "hcrs",
            Self::HeliocentricMeanEcliptic => "heliocentricmeanecliptic",
            Self::HeliographicStonyhurst => "heliographic_stonyhurst",
            Self::HeliographicCarrington => "heliographic_carrington",
            Self::Heliocentric => "heliocentric",
            Self::Helioprojective => "helioprojective",
            Self::HeliocentricEarthEcliptic => "heliocentricearthecliptic",
            Self::GeocentricSolarEcliptic => "geocentricsolarecliptic",
            Self::HeliocentricInertial => "heliocentricinertial",
            Self::GeocentricEarthEquatorial => "geocentricearthequatorial",
        }
    }

    /// CamelCase label used for diagram nodes.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Icrs => "ICRS",
            Self::Hcrs => "HCRS",
            Self::HeliocentricMeanEcliptic => "HeliocentricMeanEcliptic",
            Self::HeliographicStonyhurst => "HeliographicStonyhurst",
            Self::HeliographicCarrington => "HeliographicCarrington",
            Self::Heliocentric => "Heliocentric",
            Self::Helioprojective => "Helioprojective",
            Self::HeliocentricEarthEcliptic => "HeliocentricEarthEcliptic",
            Self::GeocentricSolarEcliptic => "GeocentricSolarEcliptic",
            Self::HeliocentricInertial => "HeliocentricInertial",
            Self::GeocentricEarthEquatorial => "GeocentricEarthEquatorial",
        }
    }

    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Icrs => "ICRS",
            Self::Hcrs => "HCRS",
            Self::HeliocentricMeanEcliptic => "HME",
            Self::HeliographicStonyhurst => "HGS",
            Self::HeliographicCarrington => "HGC",
            Self::Heliocentric => "HCC",
            Self::Helioprojective => "HPC",
            Self::HeliocentricEarthEcliptic => "HEE",
            Self::GeocentricSolarEcliptic => "GSE",
            Self::HeliocentricInertial => "HCI",
            Self::GeocentricEarthEquatorial => "GEI",
        }
    }

    /// Look up a kind by registry name, class name or abbreviation
    /// (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|k| {
            name.eq_ignore_ascii_case(k.name())
                || name.eq_ignore_ascii_case(k.class_name())
                || name.eq_ignore_ascii_case(k.abbreviation())
        })
    }

    pub const fn has_obstime(self) -> bool {
        !matches!(self, Self::Icrs)
    }

    pub const fn has_observer(self) -> bool {
        matches!(self, Self::Heliocentric | Self::Helioprojective)
    }

    pub const fn has_equinox(self) -> bool {
        matches!(self, Self::HeliocentricMeanEcliptic)
    }

    /// Frames specific to solar physics, as opposed to the general
    /// celestial frames they attach to.
    pub const fn is_solar(self) -> bool {
        !matches!(
            self,
            Self::Icrs | Self::Hcrs | Self::HeliocentricMeanEcliptic
        )
    }

    /// Upper bound of the longitude range reported by [`Coordinate::spherical`].
    pub const fn longitude_wrap_deg(self) -> f64 {
        match self {
            Self::HeliographicStonyhurst
            | Self::Helioprojective
            | Self::HeliocentricEarthEcliptic
            | Self::GeocentricSolarEcliptic
            | Self::HeliocentricInertial
            | Self::GeocentricEarthEquatorial => 180.0,
            _ => 360.0,
        }
    }

    pub const fn default_obstime(self) -> Option<Epoch> {
        match self {
            Self::Hcrs | Self::HeliocentricMeanEcliptic => Some(Epoch::J2000),
            _ => None,
        }
    }

    pub const fn default_equinox(self) -> Option<Epoch> {
        match self {
            Self::HeliocentricMeanEcliptic => Some(Epoch::J2000),
            _ => None,
        }
    }
}

impl Display for FrameKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrameKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TransformError::UnknownFrame(s.to_string()))
    }
}

/// One observation time, or a batch of them.
///
/// A batch of length N pairs elementwise with N data points; a single
/// epoch broadcasts over any number of points.
#[derive(Debug, Clone, PartialEq)]
pub struct ObsTime {
    epochs: Vec<Epoch>,
}

impl ObsTime {
    pub fn new(epochs: Vec<Epoch>) -> Result<Self, TransformError> {
        if epochs.is_empty() {
            return Err(TransformError::EmptyData);
        }
        Ok(Self { epochs })
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.epochs.len() == 1
    }

    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    /// Epoch for element `i`, broadcasting a scalar.
    pub fn get(&self, i: usize) -> Epoch {
        *broadcast_get(&self.epochs, i)
    }

    /// Elementwise exact equality with broadcasting. Batches whose lengths
    /// do not broadcast never match.
    pub fn matches(&self, other: &ObsTime) -> bool {
        match broadcast_len(self.len(), other.len()) {
            Some(n) => (0..n).all(|i| self.get(i) == other.get(i)),
            None => false,
        }
    }

    pub fn offset_seconds(&self, dt: f64) -> Self {
        Self {
            epochs: self.epochs.iter().map(|e| e.offset_seconds(dt)).collect(),
        }
    }
}

impl From<Epoch> for ObsTime {
    fn from(epoch: Epoch) -> Self {
        Self {
            epochs: vec![epoch],
        }
    }
}

impl Display for ObsTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let [only] = self.epochs.as_slice() {
            return write!(f, "{only}");
        }
        f.write_str("[")?;
        for (i, e) in self.epochs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{e}")?;
        }
        f.write_str("]")
    }
}

/// Whether two optional obstimes denote the same instant(s).
pub fn obstimes_match(a: Option<&ObsTime>, b: Option<&ObsTime>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.matches(b),
        _ => false,
    }
}

/// A frame kind with its validated attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    kind: FrameKind,
    obstime: Option<ObsTime>,
    observer: Option<Observer>,
    equinox: Option<Epoch>,
}

impl Frame {
    /// Frame of `kind` with default attributes.
    pub fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            obstime: kind.default_obstime().map(ObsTime::from),
            observer: None,
            equinox: kind.default_equinox(),
        }
    }

    /// Shorthand for `Frame::new(kind).with_obstime(obstime)`.
    pub fn at(kind: FrameKind, obstime: impl Into<ObsTime>) -> Result<Self, TransformError> {
        Self::new(kind).with_obstime(obstime)
    }

    pub fn with_obstime(mut self, obstime: impl Into<ObsTime>) -> Result<Self, TransformError> {
        if !self.kind.has_obstime() {
            return Err(self.invalid("obstime"));
        }
        self.obstime = Some(obstime.into());
        Ok(self)
    }

    /// Attach an observer. Resolved observers must be HGS coordinates.
    pub fn with_observer(mut self, observer: Observer) -> Result<Self, TransformError> {
        if !self.kind.has_observer() {
            return Err(self.invalid("observer"));
        }
        if let Observer::Resolved(coord) = &observer
            && coord.kind() != FrameKind::HeliographicStonyhurst
        {
            return Err(TransformError::InvalidObserver(coord.kind()));
        }
        self.observer = Some(observer);
        Ok(self)
    }

    pub fn with_equinox(mut self, equinox: Epoch) -> Result<Self, TransformError> {
        if !self.kind.has_equinox() {
            return Err(self.invalid("equinox"));
        }
        self.equinox = Some(equinox);
        Ok(self)
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn obstime(&self) -> Option<&ObsTime> {
        self.obstime.as_ref()
    }

    pub fn observer(&self) -> Option<&Observer> {
        self.observer.as_ref()
    }

    pub fn equinox(&self) -> Option<Epoch> {
        self.equinox
    }

    /// Copy with a token observer replaced by its ephemeris position at
    /// this frame's obstime. Frames without a token observer are returned
    /// unchanged.
    pub fn resolve_observer(&self, graph: &TransformGraph) -> Result<Self, TransformError> {
        match &self.observer {
            Some(obs @ Observer::Token(_)) => {
                let resolved = observer::resolve_observer(graph, obs, self.obstime.as_ref())?;
                Ok(Self {
                    observer: Some(resolved),
                    ..self.clone()
                })
            }
            _ => Ok(self.clone()),
        }
    }

    pub(crate) fn require_obstime(&self) -> Result<&ObsTime, TransformError> {
        self.obstime.as_ref().ok_or(TransformError::MissingAttribute {
            frame: self.kind,
            attribute: "obstime",
        })
    }

    pub(crate) fn require_equinox(&self) -> Result<Epoch, TransformError> {
        self.equinox.ok_or(TransformError::MissingAttribute {
            frame: self.kind,
            attribute: "equinox",
        })
    }

    /// The resolved observer position.
    pub(crate) fn require_observer(&self) -> Result<&Coordinate, TransformError> {
        match &self.observer {
            Some(Observer::Resolved(coord)) => Ok(coord),
            Some(Observer::Token(name)) => Err(TransformError::UnresolvedObserver(name.clone())),
            None => Err(TransformError::MissingAttribute {
                frame: self.kind,
                attribute: "observer",
            }),
        }
    }

    /// Copy with `obstime` replaced; `None` falls back to the kind default.
    /// Kinds without an obstime are returned unchanged.
    pub(crate) fn replicate_obstime(&self, obstime: Option<ObsTime>) -> Self {
        if !self.kind.has_obstime() {
            return self.clone();
        }
        Self {
            obstime: obstime.or_else(|| self.kind.default_obstime().map(ObsTime::from)),
            ..self.clone()
        }
    }

    pub(crate) fn replicate_observer(&self, observer: Option<Observer>) -> Self {
        Self {
            observer,
            ..self.clone()
        }
    }

    /// Copy with the obstime (if any) moved by `dt` seconds.
    pub(crate) fn shifted(&self, dt: f64) -> Self {
        Self {
            obstime: self.obstime.as_ref().map(|t| t.offset_seconds(dt)),
            ..self.clone()
        }
    }

    /// Intermediate frame of `kind` on a path from `from` to `to`.
    ///
    /// Each attribute of `kind` is taken from `to` when that kind defines
    /// it, else from `from`, else the default for `kind`.
    pub(crate) fn merged(kind: FrameKind, from: &Frame, to: &Frame) -> Self {
        let obstime = if kind.has_obstime() {
            let picked = if to.kind.has_obstime() {
                to.obstime.clone()
            } else if from.kind.has_obstime() {
                from.obstime.clone()
            } else {
                None
            };
            picked.or_else(|| kind.default_obstime().map(ObsTime::from))
        } else {
            None
        };
        let observer = if kind.has_observer() {
            if to.kind.has_observer() {
                to.observer.clone()
            } else {
                from.observer.clone()
            }
        } else {
            None
        };
        let equinox = if kind.has_equinox() {
            let picked = if to.kind.has_equinox() {
                to.equinox
            } else if from.kind.has_equinox() {
                from.equinox
            } else {
                None
            };
            picked.or(kind.default_equinox())
        } else {
            None
        };
        Self {
            kind,
            obstime,
            observer,
            equinox,
        }
    }

    fn invalid(&self, attribute: &'static str) -> TransformError {
        TransformError::InvalidAttribute {
            frame: self.kind,
            attribute,
        }
    }
}

impl From<FrameKind> for Frame {
    fn from(kind: FrameKind) -> Self {
        Self::new(kind)
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let mut sep = "(";
        if self.kind.has_obstime() {
            match &self.obstime {
                Some(t) => write!(f, "{sep}obstime={t}")?,
                None => write!(f, "{sep}obstime=None")?,
            }
            sep = ", ";
        }
        if self.kind.has_observer() {
            match &self.observer {
                Some(o) => write!(f, "{sep}observer={o}")?,
                None => write!(f, "{sep}observer=None")?,
            }
            sep = ", ";
        }
        if let Some(eq) = self.equinox {
            write!(f, "{sep}equinox={eq}")?;
            sep = ", ";
        }
        if sep == ", " {
            f.write_str(")")?;
        }
        Ok(())
    }
}
