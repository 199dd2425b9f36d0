//! Named zones and their fixed UTC offsets.
//!
//! Offsets are static and never follow daylight saving, even for zones
//! labelled with a DST abbreviation. Use [`OffsetSource::Iana`] for
//! date-aware offsets.
//!
//! [`OffsetSource::Iana`]: schedkit_core::OffsetSource::Iana

use serde::Serialize;

/// A named zone in the fixed offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneInfo {
    /// IANA-style key, e.g. `America/New_York`.
    pub name: &'static str,
    /// Human label shown in explanations.
    pub label: &'static str,
    /// Offset from UTC in minutes.
    pub offset_minutes: i32,
}

impl ZoneInfo {
    /// Offset rendered as `UTC+05:30` / `UTC-05:00`.
    pub fn offset_display(&self) -> String {
        format_offset(self.offset_minutes)
    }
}

pub const ZONES: &[ZoneInfo] = &[
    ZoneInfo { name: "UTC", label: "Coordinated Universal Time (UTC)", offset_minutes: 0 },
    ZoneInfo { name: "America/New_York", label: "Eastern Time (EST/EDT)", offset_minutes: -300 },
    ZoneInfo { name: "America/Chicago", label: "Central Time (CST/CDT)", offset_minutes: -360 },
    ZoneInfo { name: "America/Denver", label: "Mountain Time (MST/MDT)", offset_minutes: -420 },
    ZoneInfo { name: "America/Los_Angeles", label: "Pacific Time (PST/PDT)", offset_minutes: -480 },
    ZoneInfo { name: "Europe/London", label: "London (GMT/BST)", offset_minutes: 0 },
    ZoneInfo { name: "Europe/Paris", label: "Paris (CET/CEST)", offset_minutes: 60 },
    ZoneInfo { name: "Europe/Berlin", label: "Berlin (CET/CEST)", offset_minutes: 60 },
    ZoneInfo { name: "Asia/Kolkata", label: "India (IST)", offset_minutes: 330 },
    ZoneInfo { name: "Asia/Shanghai", label: "China (CST)", offset_minutes: 480 },
    ZoneInfo { name: "Asia/Tokyo", label: "Tokyo (JST)", offset_minutes: 540 },
    ZoneInfo { name: "Australia/Sydney", label: "Sydney (AEST/AEDT)", offset_minutes: 600 },
];

/// Case-insensitive lookup in the fixed table.
pub fn lookup_zone(name: &str) -> Option<&'static ZoneInfo> {
    let name = name.trim();
    ZONES.iter().find(|z| z.name.eq_ignore_ascii_case(name))
}

/// Human label for a zone, or the name itself when it is not in the table.
pub fn zone_label(name: &str) -> String {
    lookup_zone(name)
        .map(|z| z.label.to_string())
        .unwrap_or_else(|| name.trim().to_string())
}

pub(crate) fn format_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 60, abs % 60)
}
