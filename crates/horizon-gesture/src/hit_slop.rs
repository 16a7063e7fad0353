//! Hit slop: enlarging or shrinking a handler's effective bounds.
//!
//! Each side is a pad added outward from the view's edge (negative values
//! shrink). An explicit width anchors the box to whichever horizontal side
//! is set; height works the same way vertically. Under right-to-left layout
//! the horizontal pads are mirrored.

use horizon_gesture_core::{GestureError, Point, Result};
use serde::Deserialize;

use crate::view::{LayoutDirection, TargetInfo};

/// Resolved hit slop pads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitSlop {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Inclusive rectangle in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }
}

impl HitSlop {
    /// The same pad on every side.
    pub fn uniform(pad: f32) -> Self {
        Self {
            left: Some(pad),
            top: Some(pad),
            right: Some(pad),
            bottom: Some(pad),
            width: None,
            height: None,
        }
    }

    /// Reject combinations that can't be resolved to a rectangle.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("left", self.left),
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("width", self.width),
            ("height", self.height),
        ];
        if let Some((name, _)) = values
            .iter()
            .find(|(_, value)| value.is_some_and(|value| !value.is_finite()))
        {
            return Err(GestureError::invalid_hit_slop(format!(
                "'{name}' must be a finite number"
            )));
        }

        Self::validate_axis(self.left, self.right, self.width, "left", "right", "width")?;
        Self::validate_axis(self.top, self.bottom, self.height, "top", "bottom", "height")
    }

    fn validate_axis(
        start: Option<f32>,
        end: Option<f32>,
        extent: Option<f32>,
        start_name: &str,
        end_name: &str,
        extent_name: &str,
    ) -> Result<()> {
        match (start, end, extent) {
            (Some(_), Some(_), Some(_)) => Err(GestureError::invalid_hit_slop(format!(
                "cannot have all of {start_name}, {end_name} and {extent_name} defined"
            ))),
            (None, None, Some(_)) => Err(GestureError::invalid_hit_slop(format!(
                "when {extent_name} is set one of {start_name} or {end_name} pads needs to be defined"
            ))),
            _ => Ok(()),
        }
    }

    /// Effective bounds for a view of the given size and direction.
    pub fn bounds(&self, target: &TargetInfo) -> Bounds {
        let (pad_left, pad_right) = match target.layout_direction {
            LayoutDirection::Ltr => (self.left, self.right),
            LayoutDirection::Rtl => (self.right, self.left),
        };
        let (left, right) = resolve_axis(pad_left, pad_right, self.width, target.size.width);
        let (top, bottom) = resolve_axis(self.top, self.bottom, self.height, target.size.height);
        Bounds {
            left,
            top,
            right,
            bottom,
        }
    }
}

fn resolve_axis(start: Option<f32>, end: Option<f32>, extent: Option<f32>, size: f32) -> (f32, f32) {
    let mut low = -start.unwrap_or(0.0);
    let mut high = size + end.unwrap_or(0.0);
    if let Some(extent) = extent {
        if start.is_none() {
            low = high - extent;
        } else {
            high = low + extent;
        }
    }
    (low, high)
}

/// Whether `point` (view coordinates) lies inside the view's bounds after
/// applying the optional hit slop.
pub fn is_within_bounds(hit_slop: Option<&HitSlop>, target: &TargetInfo, point: Point) -> bool {
    match hit_slop {
        Some(hit_slop) => hit_slop.bounds(target).contains(point),
        None => target.size.contains(point),
    }
}

/// Hit slop as accepted in handler configuration: a number for every side,
/// or an object of named pads.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HitSlopConfig {
    Uniform(f32),
    Sides(HitSlopSides),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HitSlopSides {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub horizontal: Option<f32>,
    pub vertical: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl HitSlopConfig {
    /// Resolve into validated pads. `horizontal` and `vertical` fill both
    /// sides of their axis; explicit sides override them.
    pub fn resolve(self) -> Result<HitSlop> {
        let hit_slop = match self {
            Self::Uniform(pad) => HitSlop::uniform(pad),
            Self::Sides(sides) => HitSlop {
                left: sides.left.or(sides.horizontal),
                right: sides.right.or(sides.horizontal),
                top: sides.top.or(sides.vertical),
                bottom: sides.bottom.or(sides.vertical),
                width: sides.width,
                height: sides.height,
            },
        };
        hit_slop.validate()?;
        Ok(hit_slop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_gesture_core::Size;

    fn target(width: f32, height: f32) -> TargetInfo {
        TargetInfo {
            size: Size::new(width, height),
            layout_direction: LayoutDirection::Ltr,
        }
    }

    #[test]
    fn test_uniform_slop_enlarges_bounds() {
        let target = target(100.0, 100.0);
        let slop = HitSlop::uniform(10.0);

        assert!(is_within_bounds(Some(&slop), &target, Point::new(105.0, 105.0)));
        assert!(is_within_bounds(Some(&slop), &target, Point::new(-10.0, 110.0)));
        assert!(!is_within_bounds(Some(&slop), &target, Point::new(115.0, 50.0)));
    }

    #[test]
    fn test_no_slop_uses_view_bounds() {
        let target = target(100.0, 100.0);
        assert!(is_within_bounds(None, &target, Point::new(100.0, 0.0)));
        assert!(!is_within_bounds(None, &target, Point::new(100.1, 0.0)));
    }

    #[test]
    fn test_width_anchored_to_set_side() {
        let target = target(100.0, 100.0);

        let anchored_left = HitSlop {
            left: Some(0.0),
            width: Some(40.0),
            ..HitSlop::default()
        };
        let bounds = anchored_left.bounds(&target);
        assert_eq!((bounds.left, bounds.right), (0.0, 40.0));

        let anchored_right = HitSlop {
            right: Some(10.0),
            width: Some(40.0),
            ..HitSlop::default()
        };
        let bounds = anchored_right.bounds(&target);
        assert_eq!((bounds.left, bounds.right), (70.0, 110.0));
    }

    #[test]
    fn test_rtl_mirrors_horizontal_pads() {
        let slop = HitSlop {
            left: Some(20.0),
            ..HitSlop::default()
        };
        let rtl = TargetInfo {
            size: Size::new(100.0, 100.0),
            layout_direction: LayoutDirection::Rtl,
        };
        let bounds = slop.bounds(&rtl);
        assert_eq!((bounds.left, bounds.right), (0.0, 120.0));
    }

    #[test]
    fn test_invalid_combinations() {
        let all_three = HitSlop {
            left: Some(1.0),
            right: Some(1.0),
            width: Some(10.0),
            ..HitSlop::default()
        };
        assert!(all_three.validate().is_err());

        let width_alone = HitSlop {
            width: Some(10.0),
            ..HitSlop::default()
        };
        assert!(width_alone.validate().is_err());

        let height_alone = HitSlop {
            height: Some(10.0),
            ..HitSlop::default()
        };
        assert!(height_alone.validate().is_err());
    }

    #[test]
    fn test_config_forms() {
        let uniform: HitSlopConfig = serde_json::from_value(serde_json::json!(10)).unwrap();
        assert_eq!(uniform.resolve().unwrap(), HitSlop::uniform(10.0));

        let sides: HitSlopConfig =
            serde_json::from_value(serde_json::json!({ "horizontal": 5, "left": 8 })).unwrap();
        let resolved = sides.resolve().unwrap();
        assert_eq!(resolved.left, Some(8.0));
        assert_eq!(resolved.right, Some(5.0));
        assert_eq!(resolved.top, None);

        let bad: HitSlopConfig =
            serde_json::from_value(serde_json::json!({ "width": 5 })).unwrap();
        assert!(bad.resolve().is_err());
    }
}
