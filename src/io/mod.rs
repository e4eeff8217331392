//! I/O module for reading DWG section maps

pub mod dwg;
