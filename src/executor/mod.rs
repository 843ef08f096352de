pub mod scan;
pub mod sequential_scan;
