pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok", service: "colmeia" };
        assert_eq!(h.status, "ok");
        assert_eq!(h.service, "colmeia");
    }
}
