pub mod global_file;
pub mod site_file;
