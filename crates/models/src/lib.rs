pub mod errors;
pub mod db;
pub mod profile;
pub mod service_request;

#[cfg(test)]
mod tests;
