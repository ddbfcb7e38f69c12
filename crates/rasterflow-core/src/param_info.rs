//! Parameter introspection for operators.
//!
//! Every operator exposes its parameters through [`ParameterInfo`]: an
//! index-based API where each parameter is described by a [`ParamDescriptor`].
//! Controllers use it to build sliders, to address parameters by name
//! (see [`ImageGraph::set_parameter`](crate::ImageGraph::set_parameter)), and to
//! format values for display.
//!
//! All values travel as `f32`. Integer and enumerated parameters carry
//! [`ParamFlags::STEPPED`] and are rounded by [`ParamDescriptor::clamp`].
//!
//! # Example
//!
//! ```rust
//! use rasterflow_core::{ParameterInfo, ParamDescriptor, ParamUnit};
//!
//! struct Gamma {
//!     gamma: f32,
//! }
//!
//! impl ParameterInfo for Gamma {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::custom("Gamma", "Gamma", 0.1, 5.0, 1.0)
//!                 .with_id("gamma")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gamma,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.gamma = value.clamp(0.1, 5.0);
//!         }
//!     }
//! }
//!
//! let g = Gamma { gamma: 1.0 };
//! assert_eq!(g.find_param_by_name("gamma"), Some(0));
//! ```

/// Display unit of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Unitless value.
    #[default]
    None,
    /// Whole pixels (radii, offsets).
    Pixels,
    /// Angle in degrees.
    Degrees,
    /// Multiplicative factor, shown as `1.50x`.
    Ratio,
    /// Fraction in `[0, 1]`, shown as a percentage.
    Fraction,
    /// Channel level offset on the 0–255 scale.
    Level,
}

/// Capability flags for a parameter.
///
/// Use [`union`](Self::union) to combine.
///
/// ```rust
/// use rasterflow_core::ParamFlags;
///
/// let flags = ParamFlags::STEPPED.union(ParamFlags::WRAPS);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::NONE.contains(ParamFlags::WRAPS));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Discrete integer steps (integers and enumerations).
    pub const STEPPED: Self = Self(1 << 0);
    /// Value wraps around `[min, max)` instead of clamping (angles).
    pub const WRAPS: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Trait for operators that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index; indices are stable for the
/// lifetime of the operator. `set_param` implementations clamp (or wrap) the
/// incoming value to the descriptor's range and ignore unknown indices.
pub trait ParameterInfo {
    /// Returns the number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at `index`, or `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at `index` (`0.0` if out of range).
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, clamping to its range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches [`ParamDescriptor::name`], [`ParamDescriptor::short_name`], and
    /// [`ParamDescriptor::string_id`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || (!desc.string_id.is_empty() && desc.string_id.eq_ignore_ascii_case(name))
            })
        })
    }
}

/// Describes a single parameter for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g., "Brightness").
    pub name: &'static str,
    /// Short name, at most 8 characters.
    pub short_name: &'static str,
    /// Unit used by [`format_value`](Self::format_value).
    pub unit: ParamUnit,
    /// Minimum value.
    pub min: f32,
    /// Maximum value (exclusive when [`ParamFlags::WRAPS`] is set).
    pub max: f32,
    /// Value at construction.
    pub default: f32,
    /// Suggested increment for sliders and encoders.
    pub step: f32,
    /// Stable snake_case id used on the command line (e.g., `"brightness"`).
    pub string_id: &'static str,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Labels for enumerated values, indexed by `value - min`.
    pub step_labels: &'static [&'static str],
}

impl ParamDescriptor {
    /// Continuous parameter with a custom name and range.
    pub fn custom(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: (max - min) / 100.0,
            string_id: "",
            flags: ParamFlags::NONE,
            step_labels: &[],
        }
    }

    /// Integer parameter (stepped, step 1).
    pub fn integer(name: &'static str, short_name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            step: 1.0,
            flags: ParamFlags::STEPPED,
            ..Self::custom(name, short_name, min, max, default)
        }
    }

    /// Enumerated parameter whose values are `0..labels.len()`.
    pub fn choice(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        default: f32,
    ) -> Self {
        Self {
            step_labels: labels,
            ..Self::integer(name, short_name, 0.0, labels.len().saturating_sub(1) as f32, default)
        }
    }

    /// Sets the stable string id.
    pub fn with_id(mut self, string_id: &'static str) -> Self {
        self.string_id = string_id;
        self
    }

    /// Sets the display unit.
    pub fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Adds flags to the descriptor.
    pub fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    /// Brings `value` into range.
    ///
    /// Wrapping parameters are reduced modulo `max - min`; all others are
    /// clamped. Stepped parameters are rounded to the nearest integer first.
    pub fn clamp(&self, value: f32) -> f32 {
        let value = if self.flags.contains(ParamFlags::STEPPED) {
            value.round()
        } else {
            value
        };
        if self.flags.contains(ParamFlags::WRAPS) {
            let span = self.max - self.min;
            let wrapped = self.min + (value - self.min).rem_euclid(span);
            // rem_euclid can round up to `span` for tiny negative inputs.
            if wrapped >= self.max { self.min } else { wrapped }
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Returns the label for an enumerated value, if any.
    pub fn label_for(&self, value: f32) -> Option<&'static str> {
        let idx = (value - self.min).round();
        if idx < 0.0 {
            return None;
        }
        self.step_labels.get(idx as usize).copied()
    }

    /// Formats a value with its unit (or its step label).
    pub fn format_value(&self, value: f32) -> String {
        if let Some(label) = self.label_for(value) {
            return label.to_string();
        }
        match self.unit {
            ParamUnit::None => {
                if self.flags.contains(ParamFlags::STEPPED) {
                    format!("{value:.0}")
                } else {
                    format!("{value:.2}")
                }
            }
            ParamUnit::Pixels => format!("{value:.0} px"),
            ParamUnit::Degrees => format!("{value:.1}°"),
            ParamUnit::Ratio => format!("{value:.2}x"),
            ParamUnit::Fraction => format!("{:.0}%", value * 100.0),
            ParamUnit::Level => format!("{value:+.0}"),
        }
    }

    /// Parses display text (a number, a step label, or a percentage for
    /// fractions) back to a value. The result is not clamped.
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let text = text.trim();
        if let Some(pos) = self
            .step_labels
            .iter()
            .position(|label| label.eq_ignore_ascii_case(text))
        {
            return Some(self.min + pos as f32);
        }
        if self.unit == ParamUnit::Fraction
            && let Some(pct) = text.strip_suffix('%')
        {
            return pct.trim().parse::<f32>().ok().map(|p| p / 100.0);
        }
        let numeric = text
            .trim_end_matches("px")
            .trim_end_matches('°')
            .trim_end_matches('x')
            .trim();
        numeric.parse::<f32>().ok()
    }
}
