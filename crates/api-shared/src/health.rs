use crate::wire::HealthRes;

/// Liveness check shared by every API surface.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Report the service as healthy. Storage reachability is not probed.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Carevault is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_alive() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.message, "Carevault is alive");
    }
}
