/// Centralized coordinate axis naming utilities
///
/// Provides consistent axis names for marker coordinates across the reader,
/// the console reports and the plot functions.
/// Get the standard coordinate axis name for a given index
///
/// # Arguments
/// * `index` - Axis index (0=X, 1=Y, 2=Z)
///
/// # Returns
/// Static string slice with the axis name
///
/// # Panics
/// Panics if index is greater than 2
pub fn axis_name(index: usize) -> &'static str {
    match index {
        0 => "X",
        1 => "Y",
        2 => "Z",
        _ => panic!(
            "Invalid axis index: {}. Expected 0 (X), 1 (Y), or 2 (Z)",
            index
        ),
    }
}

/// Get all axis names as a static array
pub const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];

/// Number of coordinate axes per marker sample
pub const AXIS_COUNT: usize = AXIS_NAMES.len();

/// Joint angle names per side, in q1, q2, q3 order
pub const RIGHT_ANGLE_NAMES: [&str; 3] = ["qr1", "qr2", "qr3"];
pub const LEFT_ANGLE_NAMES: [&str; 3] = ["ql1", "ql2", "ql3"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_name() {
        assert_eq!(axis_name(0), "X");
        assert_eq!(axis_name(1), "Y");
        assert_eq!(axis_name(2), "Z");
    }

    #[test]
    #[should_panic(expected = "Invalid axis index")]
    fn test_axis_name_panic() {
        axis_name(3);
    }

    #[test]
    fn test_axis_names_constant() {
        assert_eq!(AXIS_NAMES[0], "X");
        assert_eq!(AXIS_NAMES[1], "Y");
        assert_eq!(AXIS_NAMES[2], "Z");
        assert_eq!(AXIS_COUNT, 3);
    }
}
