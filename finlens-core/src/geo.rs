//! Map marker placement.
//!
//! Transactions recorded at exactly the same coordinate would render as one
//! marker. Duplicates are pushed out along a golden-angle spiral around the
//! shared point so every marker stays visible and close to where it happened.
//!
//! Output is deterministic but order-sensitive: the first record at a
//! coordinate keeps it, the k-th repeat gets spiral slot k.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::transaction::{GeoPoint, Transaction, TransactionType};

/// Radial step between spiral slots, in decimal degrees (about 20 m)
pub const UNIT_OFFSET: f64 = 0.0002;

/// Angular step between spiral slots, in degrees
pub const GOLDEN_ANGLE_DEG: f64 = 137.5;

pub const FALLBACK_CENTER: GeoPoint = GeoPoint {
    lat: 20.5937,
    lng: 78.9629,
};
pub const FOCUSED_ZOOM: u8 = 12;
pub const FALLBACK_ZOOM: u8 = 5;

/// Smallest usable radial step. Below it, slots can round onto each other.
pub const MIN_UNIT_OFFSET: f64 = 1e-9;

/// Whether `unit_offset` keeps every spiral slot on its own coordinate
pub fn is_valid_unit_offset(unit_offset: f64) -> bool {
    unit_offset.is_finite() && unit_offset >= MIN_UNIT_OFFSET
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoOptions {
    pub unit_offset: f64,
    pub fallback_center: GeoPoint,
    pub focused_zoom: u8,
    pub fallback_zoom: u8,
}

impl Default for GeoOptions {
    fn default() -> Self {
        Self {
            unit_offset: UNIT_OFFSET,
            fallback_center: FALLBACK_CENTER,
            focused_zoom: FOCUSED_ZOOM,
            fallback_zoom: FALLBACK_ZOOM,
        }
    }
}

/// A render-ready marker for one geo-tagged transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OffsetMarker {
    pub id: String,
    /// Displayed coordinate
    pub position: GeoPoint,
    /// Coordinate as recorded
    pub original: GeoPoint,
    /// Zero for the first record at `original`
    pub occurrence: usize,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Markers plus the viewport a map should open on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerLayout {
    pub markers: Vec<OffsetMarker>,
    pub center: GeoPoint,
    pub zoom_hint: u8,
    /// `center` comes from the data rather than the fallback
    pub has_data_center: bool,
}

/// Exact coordinate identity. `-0.0` and `0.0` are the same place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CoordKey(u64, u64);

impl CoordKey {
    fn of(p: GeoPoint) -> Self {
        let fold = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
        CoordKey(fold(p.lat), fold(p.lng))
    }
}

/// Displacement of spiral slot `k` (slot 0 is the origin).
pub fn spiral_offset(k: usize, unit_offset: f64) -> (f64, f64) {
    if k == 0 {
        return (0.0, 0.0);
    }
    let radius = k as f64 * unit_offset;
    let angle = (k as f64 * GOLDEN_ANGLE_DEG).rem_euclid(360.0).to_radians();
    (angle.cos() * radius, angle.sin() * radius)
}

pub fn offset(txns: &[Transaction]) -> Vec<OffsetMarker> {
    offset_with(txns, UNIT_OFFSET)
}

/// Unusable steps (zero, negative, NaN, too small) fall back to [`UNIT_OFFSET`].
pub fn offset_with(txns: &[Transaction], unit_offset: f64) -> Vec<OffsetMarker> {
    let unit_offset = if is_valid_unit_offset(unit_offset) {
        unit_offset
    } else {
        tracing::warn!(unit_offset, fallback = UNIT_OFFSET, "unusable marker offset step");
        UNIT_OFFSET
    };

    let tagged: Vec<(&Transaction, GeoPoint)> = txns
        .iter()
        .filter_map(|t| t.geo_point().map(|p| (t, p)))
        .collect();

    // Every recorded coordinate is reserved up front so the first record at a
    // point never has to move.
    let mut occupied: HashSet<CoordKey> = tagged.iter().map(|(_, p)| CoordKey::of(*p)).collect();
    let mut seen: HashMap<CoordKey, usize> = HashMap::new();
    let mut next_slot: HashMap<CoordKey, usize> = HashMap::new();

    let mut markers = Vec::with_capacity(tagged.len());
    for (txn, original) in tagged {
        let key = CoordKey::of(original);
        let count = seen.entry(key).or_insert(0);
        let occurrence = *count;
        *count += 1;

        let position = if occurrence == 0 {
            original
        } else {
            let slot = next_slot.entry(key).or_insert(1);
            let (position, used) = free_slot(original, *slot, unit_offset, &occupied);
            *slot = used + 1;
            occupied.insert(CoordKey::of(position));
            position
        };

        markers.push(OffsetMarker {
            id: txn.id.clone(),
            position,
            original,
            occurrence,
            kind: txn.kind,
            amount: txn.amount,
            category: txn.category.clone(),
            description: txn.description.clone(),
        });
    }

    let shifted = markers.iter().filter(|m| m.occurrence > 0).count();
    tracing::debug!(markers = markers.len(), shifted, "placed map markers");
    markers
}

/// First spiral slot at or after `start` whose coordinate is unoccupied.
///
/// Slots of a valid step are pairwise distinct, so among `occupied.len() + 1`
/// consecutive slots at least one is free.
fn free_slot(
    origin: GeoPoint,
    start: usize,
    unit_offset: f64,
    occupied: &HashSet<CoordKey>,
) -> (GeoPoint, usize) {
    let place = |k: usize| {
        let (dlat, dlng) = spiral_offset(k, unit_offset);
        GeoPoint::new(origin.lat + dlat, origin.lng + dlng)
    };

    for k in start..=start + occupied.len() {
        let candidate = place(k);
        if !occupied.contains(&CoordKey::of(candidate)) {
            return (candidate, k);
        }
    }
    tracing::error!(?origin, "no free spiral slot; marker overlaps another");
    (place(start), start)
}

/// Marker set with the viewport metadata a map view needs.
pub fn layout(txns: &[Transaction]) -> MarkerLayout {
    layout_with(txns, &GeoOptions::default())
}

pub fn layout_with(txns: &[Transaction], opts: &GeoOptions) -> MarkerLayout {
    let markers = offset_with(txns, opts.unit_offset);
    match txns.iter().find_map(Transaction::geo_point) {
        Some(center) => MarkerLayout {
            markers,
            center,
            zoom_hint: opts.focused_zoom,
            has_data_center: true,
        },
        None => MarkerLayout {
            markers,
            center: opts.fallback_center,
            zoom_hint: opts.fallback_zoom,
            has_data_center: false,
        },
    }
}
