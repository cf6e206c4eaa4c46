// tests/y_axis_formatting_test.rs

use mocap_angles::plot_framework::format_axis_label;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_y_axis_formatting() {
        let angle_label = "Angle (deg)";

        assert_eq!(format_axis_label(0.0, angle_label), "0");
        assert_eq!(format_axis_label(90.0, angle_label), "90");
        assert_eq!(format_axis_label(180.0, angle_label), "180");
        assert_eq!(format_axis_label(-45.0, angle_label), "-45");

        // Fractional values below 10 keep one decimal
        assert_eq!(format_axis_label(0.5, angle_label), "0.5");
        assert_eq!(format_axis_label(2.5, angle_label), "2.5");
        assert_eq!(format_axis_label(-7.2, angle_label), "-7.2");
    }

    #[test]
    fn test_rate_y_axis_formatting() {
        // Angular rates can reach thousands of degrees per second
        let rate_label = "dq2/dt (deg/s)";

        assert_eq!(format_axis_label(1000.0, rate_label), "1k");
        assert_eq!(format_axis_label(5000.0, rate_label), "5k");
        assert_eq!(format_axis_label(-2000.0, rate_label), "-2k");
        assert_eq!(format_axis_label(12_000.0, rate_label), "12k");

        assert_eq!(format_axis_label(1_000_000.0, rate_label), "1.0M");
        assert_eq!(format_axis_label(2_500_000.0, rate_label), "2.5M");
    }

    #[test]
    fn test_position_y_axis_formatting() {
        // Marker positions stay in plain millimeters, no k notation
        let position_label = "Z (mm)";

        assert_eq!(format_axis_label(1250.0, position_label), "1250");
        assert_eq!(format_axis_label(-30.2, position_label), "-30");
        assert_eq!(format_axis_label(10.7, position_label), "11");
        assert_eq!(format_axis_label(0.4, position_label), "0");
    }
}
