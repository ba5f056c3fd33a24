pub mod assignment;
pub mod attendance;
pub mod dashboard;
pub mod leads;
pub mod seed;
pub mod sellers;
