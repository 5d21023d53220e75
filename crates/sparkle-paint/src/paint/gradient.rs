use std::collections::HashMap;

use serde_json::{Map, Value};

use super::Rgba8;
use super::color::unit_clamp;
use crate::error::{MalformedColorStop, StopFault};

/// A single gradient stop.
///
/// `progress` lies in `[0, 1]` once the stop is part of a [`ColorStopTable`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub progress: f64,
    pub color: Rgba8,
}

impl ColorStop {
    #[inline]
    pub const fn new(progress: f64, color: Rgba8) -> Self {
        Self { progress, color }
    }
}

/// Typed form of a raw stop record: unit-range channels plus progress.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RawColorStop {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
    pub p: f64,
}

impl RawColorStop {
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64, p: f64) -> Self {
        Self { r, g, b, a, p }
    }
}

/// A dynamically-typed record carrying the five stop fields `r`, `g`, `b`,
/// `a` and `p`.
///
/// Adapters for host value systems implement this so that field validation
/// happens in one place, inside [`ColorStopTable::build`].
pub trait StopRecord {
    /// Looks up a numeric field by name.
    fn number(&self, field: &'static str) -> Result<f64, StopFault>;
}

impl<T: StopRecord + ?Sized> StopRecord for &T {
    #[inline]
    fn number(&self, field: &'static str) -> Result<f64, StopFault> {
        (**self).number(field)
    }
}

impl StopRecord for RawColorStop {
    fn number(&self, field: &'static str) -> Result<f64, StopFault> {
        match field {
            "r" => Ok(self.r),
            "g" => Ok(self.g),
            "b" => Ok(self.b),
            "a" => Ok(self.a),
            "p" => Ok(self.p),
            _ => Err(StopFault::MissingField(field)),
        }
    }
}

impl StopRecord for Map<String, Value> {
    fn number(&self, field: &'static str) -> Result<f64, StopFault> {
        self.get(field)
            .ok_or(StopFault::MissingField(field))?
            .as_f64()
            .ok_or(StopFault::NotNumeric(field))
    }
}

impl StopRecord for Value {
    fn number(&self, field: &'static str) -> Result<f64, StopFault> {
        match self {
            Value::Object(map) => map.number(field),
            _ => Err(StopFault::NotARecord),
        }
    }
}

impl StopRecord for HashMap<String, f64> {
    fn number(&self, field: &'static str) -> Result<f64, StopFault> {
        self.get(field).copied().ok_or(StopFault::MissingField(field))
    }
}

/// Validated color stops, sorted ascending by progress.
///
/// Invariants:
/// - every `progress` is in `[0, 1]`
/// - stops are non-decreasing in `progress`; equal-progress stops keep the
///   order they were supplied in
///
/// The table is read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorStopTable {
    stops: Vec<ColorStop>,
}

impl ColorStopTable {
    /// Validates, clamps and sorts raw stop records.
    ///
    /// Fails on the first record that is not a map, lacks one of `r`, `g`,
    /// `b`, `a`, `p`, or carries a non-numeric value there.
    pub fn build<I>(records: I) -> Result<Self, MalformedColorStop>
    where
        I: IntoIterator,
        I::Item: StopRecord,
    {
        let stops = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                read_stop(&record).map_err(|fault| MalformedColorStop { index, fault })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = Self::from_stops(stops);
        log::trace!("built color stop table with {} stops", table.len());
        Ok(table)
    }

    /// Builds from already-typed stops. Progress is clamped to `[0, 1]`.
    pub fn from_stops(mut stops: Vec<ColorStop>) -> Self {
        for stop in &mut stops {
            stop.progress = unit_clamp(stop.progress);
        }
        // Stable: ties keep insertion order. Clamped values are never NaN or -0.
        stops.sort_by(|a, b| a.progress.total_cmp(&b.progress));
        Self { stops }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `progress`.
    ///
    /// Lower-bound search for the first stop with `progress >= p`:
    /// - none below (`p` at or before the first stop, or NaN): first color
    /// - none at or above: last color
    /// - otherwise an intensity-domain blend of the two neighbors
    ///
    /// An empty table yields transparent black.
    pub fn lookup(&self, progress: f64) -> Rgba8 {
        let stops = &self.stops;
        let Some(first) = stops.first() else {
            return Rgba8::TRANSPARENT;
        };

        let idx = stops.partition_point(|s| s.progress < progress);
        if idx == 0 {
            return first.color;
        }
        if idx == stops.len() {
            return stops[idx - 1].color;
        }

        // stops[idx - 1].progress < progress <= stops[idx].progress, so the
        // span is strictly positive.
        let lo = stops[idx - 1];
        let hi = stops[idx];
        let q = (progress - lo.progress) / (hi.progress - lo.progress);
        lo.color.mix_intensity(hi.color, q)
    }

    /// [`lookup`](Self::lookup) packed as `0xRRGGBBAA`.
    #[inline]
    pub fn lookup_packed(&self, progress: f64) -> u32 {
        self.lookup(progress).to_packed()
    }
}

fn read_stop(record: &impl StopRecord) -> Result<ColorStop, StopFault> {
    let r = record.number("r")?;
    let g = record.number("g")?;
    let b = record.number("b")?;
    let a = record.number("a")?;
    let p = record.number("p")?;
    Ok(ColorStop::new(unit_clamp(p), Rgba8::from_unit(r, g, b, a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
    const GREEN: Rgba8 = Rgba8::new(0, 255, 0, 255);
    const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 255);
    const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    fn raw(r: f64, g: f64, b: f64, a: f64, p: f64) -> RawColorStop {
        RawColorStop::new(r, g, b, a, p)
    }

    fn three_stops() -> ColorStopTable {
        ColorStopTable::build([
            raw(1.0, 0.0, 0.0, 1.0, 0.0),
            raw(0.0, 1.0, 0.0, 1.0, 0.5),
            raw(0.0, 0.0, 1.0, 1.0, 1.0),
        ])
        .unwrap()
    }

    // ── build ─────────────────────────────────────────────────────────────

    #[test]
    fn build_sorts_by_progress() {
        let t = ColorStopTable::build([
            raw(0.0, 0.0, 1.0, 1.0, 0.9),
            raw(1.0, 0.0, 0.0, 1.0, 0.1),
            raw(0.0, 1.0, 0.0, 1.0, 0.4),
        ])
        .unwrap();
        let p: Vec<f64> = t.stops().iter().map(|s| s.progress).collect();
        assert_eq!(p, vec![0.1, 0.4, 0.9]);
        assert_eq!(t.stops()[0].color, RED);
    }

    #[test]
    fn build_is_stable_on_ties() {
        let t = ColorStopTable::build([
            raw(0.0, 1.0, 0.0, 1.0, 0.5),
            raw(1.0, 0.0, 0.0, 1.0, 0.0),
            raw(0.0, 0.0, 1.0, 1.0, 0.5),
            raw(1.0, 1.0, 1.0, 1.0, 0.5),
        ])
        .unwrap();
        let colors: Vec<Rgba8> = t.stops().iter().map(|s| s.color).collect();
        assert_eq!(colors, vec![RED, GREEN, BLUE, WHITE]);
    }

    #[test]
    fn build_clamps_every_value() {
        let t = ColorStopTable::build([
            raw(-1.0, 2.0, 0.5, 9.0, -4.0),
            raw(0.25, -0.1, 1.5, -2.0, 7.0),
        ])
        .unwrap();
        assert_eq!(t.stops()[0], ColorStop::new(0.0, Rgba8::new(0, 255, 127, 255)));
        assert_eq!(t.stops()[1], ColorStop::new(1.0, Rgba8::new(63, 0, 255, 0)));
    }

    #[test]
    fn build_from_json_values() {
        let v = json!([
            { "r": 1, "g": 0, "b": 0, "a": 1, "p": 1 },
            { "r": 0, "g": 0, "b": 1, "a": 1, "p": 0 }
        ]);
        let t = ColorStopTable::build(v.as_array().unwrap()).unwrap();
        assert_eq!(t.stops()[0].color, BLUE);
        assert_eq!(t.stops()[1].color, RED);
    }

    #[test]
    fn build_from_hash_map() {
        let m: HashMap<String, f64> = [("r", 1.0), ("g", 1.0), ("b", 1.0), ("a", 0.5), ("p", 0.3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let t = ColorStopTable::build([m]).unwrap();
        assert_eq!(t.stops(), &[ColorStop::new(0.3, Rgba8::new(255, 255, 255, 127))]);
    }

    #[test]
    fn build_rejects_missing_alpha() {
        let v = json!([
            { "r": 1, "g": 0, "b": 0, "a": 1, "p": 0 },
            { "r": 0, "g": 0, "b": 1, "p": 1 }
        ]);
        let err = ColorStopTable::build(v.as_array().unwrap()).unwrap_err();
        assert_eq!(err, MalformedColorStop { index: 1, fault: StopFault::MissingField("a") });
    }

    #[test]
    fn build_rejects_non_numeric_field() {
        let v = json!([{ "r": 1, "g": 0, "b": 0, "a": 1, "p": "half" }]);
        let err = ColorStopTable::build(v.as_array().unwrap()).unwrap_err();
        assert_eq!(err.fault, StopFault::NotNumeric("p"));
    }

    #[test]
    fn build_rejects_non_record() {
        let v = json!([{ "r": 1, "g": 0, "b": 0, "a": 1, "p": 0 }, [1, 0, 0, 1, 1]]);
        let err = ColorStopTable::build(v.as_array().unwrap()).unwrap_err();
        assert_eq!(err, MalformedColorStop { index: 1, fault: StopFault::NotARecord });
    }

    #[test]
    fn from_stops_clamps_progress() {
        let t = ColorStopTable::from_stops(vec![
            ColorStop::new(3.0, RED),
            ColorStop::new(f64::NAN, BLUE),
        ]);
        assert_eq!(t.stops()[0], ColorStop::new(0.0, BLUE));
        assert_eq!(t.stops()[1], ColorStop::new(1.0, RED));
    }

    #[test]
    fn signed_zero_progress_ties_keep_order() {
        let t = ColorStopTable::from_stops(vec![
            ColorStop::new(0.0, RED),
            ColorStop::new(-0.0, GREEN),
            ColorStop::new(-1.0, BLUE),
        ]);
        let colors: Vec<Rgba8> = t.stops().iter().map(|s| s.color).collect();
        assert_eq!(colors, vec![RED, GREEN, BLUE]);
        assert!(t.stops().iter().all(|s| s.progress.is_sign_positive()));
    }

    // ── lookup ────────────────────────────────────────────────────────────

    #[test]
    fn lookup_below_range_returns_first() {
        let t = three_stops();
        assert_eq!(t.lookup(-10.0), RED);
        assert_eq!(t.lookup(0.0), RED);
        assert_eq!(t.lookup(f64::NAN), RED);
    }

    #[test]
    fn lookup_above_range_returns_last() {
        let t = three_stops();
        assert_eq!(t.lookup(10.0), BLUE);
        assert_eq!(t.lookup(f64::INFINITY), BLUE);
    }

    #[test]
    fn lookup_exact_stop_returns_its_color() {
        assert_eq!(three_stops().lookup(0.5), GREEN);
        assert_eq!(three_stops().lookup(1.0), BLUE);
    }

    #[test]
    fn lookup_midpoint_is_power_correct() {
        let t = ColorStopTable::build([raw(1.0, 0.0, 0.0, 1.0, 0.0), raw(0.0, 0.0, 1.0, 1.0, 1.0)])
            .unwrap();
        let c = t.lookup(0.5);
        // sqrt(255² · 0.5) = 180.3; a naive lerp would give 127.
        assert_eq!(c, Rgba8::new(180, 0, 180, 255));
    }

    #[test]
    fn lookup_on_ties_approaches_each_side() {
        let t = ColorStopTable::from_stops(vec![
            ColorStop::new(0.0, RED),
            ColorStop::new(0.5, GREEN),
            ColorStop::new(0.5, BLUE),
            ColorStop::new(1.0, WHITE),
        ]);
        assert_eq!(t.lookup(0.5), GREEN);
        // Just above the tie the blend starts from the later stop.
        let c = t.lookup(0.5 + 1e-9);
        assert_eq!((c.r, c.g), (0, 0));
        assert!(c.b >= 254);
    }

    #[test]
    fn lookup_empty_and_single() {
        assert_eq!(ColorStopTable::default().lookup(0.3), Rgba8::TRANSPARENT);
        let one = ColorStopTable::from_stops(vec![ColorStop::new(0.4, GREEN)]);
        assert_eq!(one.lookup(0.0), GREEN);
        assert_eq!(one.lookup(0.9), GREEN);
    }

    #[test]
    fn lookup_packed_matches_lookup() {
        let t = three_stops();
        assert_eq!(t.lookup_packed(0.25), t.lookup(0.25).to_packed());
    }
}
