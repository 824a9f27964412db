use roomcal_core::config::LayoutSettings;
use serde::Serialize;

use super::EventLayout;

/// ## Summary
/// Horizontal placement inside a day column.
///
/// Left edge is `left_percent% + left_px`, width is `width_percent% - shrink_px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGeometry {
    pub left_percent: f64,
    pub left_px: f64,
    pub width_percent: f64,
    pub shrink_px: f64,
}

impl EventLayout {
    /// ## Summary
    /// Maps the column assignment to geometry.
    ///
    /// A full-width layout is inset by `margin_px` on both sides. Otherwise
    /// every column gets an equal share and all but the last column give up
    /// `gap_px` on their right edge.
    #[must_use]
    pub fn geometry(&self, settings: &LayoutSettings) -> ColumnGeometry {
        let margin = f64::from(settings.margin_px);

        if self.is_full_width() {
            return ColumnGeometry {
                left_percent: 0.0,
                left_px: margin,
                width_percent: 100.0,
                shrink_px: 2.0 * margin,
            };
        }

        let share = 100.0 / f64::from(self.total_columns);
        let is_last = self.column + 1 >= self.total_columns;

        ColumnGeometry {
            left_percent: share * f64::from(self.column),
            left_px: 0.0,
            width_percent: share,
            shrink_px: if is_last { 0.0 } else { f64::from(settings.gap_px) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: LayoutSettings = LayoutSettings {
        margin_px: 4.0,
        gap_px: 2.0,
    };

    #[test]
    fn test_full_width() {
        let geo = EventLayout::FULL_WIDTH.geometry(&SETTINGS);
        assert_eq!(
            geo,
            ColumnGeometry {
                left_percent: 0.0,
                left_px: 4.0,
                width_percent: 100.0,
                shrink_px: 8.0,
            }
        );
    }

    #[test]
    fn test_columns_share_width() {
        let first = EventLayout {
            column: 0,
            total_columns: 4,
        }
        .geometry(&SETTINGS);
        let last = EventLayout {
            column: 3,
            total_columns: 4,
        }
        .geometry(&SETTINGS);

        assert!((first.width_percent - 25.0).abs() < f64::EPSILON);
        assert!((first.shrink_px - 2.0).abs() < f64::EPSILON);
        assert!((last.left_percent - 75.0).abs() < f64::EPSILON);
        assert!(last.shrink_px.abs() < f64::EPSILON);
    }
}
