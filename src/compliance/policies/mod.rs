mod scan_status;

pub use scan_status::{
    classify_composition_scan, classify_static_scan, parse_remote_timestamp, policies_pass,
    Cutoff,
};
