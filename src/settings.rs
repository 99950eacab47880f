//! Global settings threaded through evaluation and entry, instead of being
//! kept as free-floating mutable globals (Design Notes: "thread an explicit
//! Settings struct through evaluate and the entry controller").

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub use_radians: bool,
    pub auto_fractions: bool,
    pub significant_digits: u8,
    pub as_mixed_number: bool,
    pub force_decimal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_radians: true,
            auto_fractions: true,
            significant_digits: 10,
            as_mixed_number: false,
            force_decimal: false,
        }
    }
}
