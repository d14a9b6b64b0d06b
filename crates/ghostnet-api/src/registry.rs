//! Ghost-net registry: report submission and status-lifecycle
//! transitions with actor attribution.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use ghostnet_db::Database;
use ghostnet_db::models::GhostNetRow;
use ghostnet_types::api::{ReportNetRequest, UpdateStatusRequest};
use ghostnet_types::models::{GhostNet, NetStatus};

use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct NetRegistry {
    db: Arc<Database>,
}

impl NetRegistry {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn list(&self) -> ApiResult<Vec<GhostNet>> {
        let rows = self.db.list_ghost_nets()?;
        rows.into_iter()
            .map(|row| row.into_model().map_err(ApiError::from))
            .collect()
    }

    /// Record a new sighting. The reporter comes from the server-side
    /// call context, never from the request body; `None` means the
    /// report is anonymous. Whatever status the client sent is ignored
    /// and the record starts as REPORTED.
    pub fn submit(&self, req: ReportNetRequest, reporter: Option<i64>) -> ApiResult<GhostNet> {
        let latitude = require_in_range(req.latitude, -90.0, 90.0, "latitude")?;
        let longitude = require_in_range(req.longitude, -180.0, 180.0, "longitude")?;
        // size_meters is optional and deliberately unchecked

        let now = Utc::now();
        let status = NetStatus::Reported;
        let id = self.db.insert_ghost_net(
            latitude,
            longitude,
            req.size_meters,
            status.as_str(),
            reporter,
            &now.to_rfc3339(),
        )?;

        info!(net_id = id, anonymous = reporter.is_none(), "ghost net reported");

        Ok(GhostNet {
            id,
            latitude,
            longitude,
            size_meters: req.size_meters,
            status,
            reported_by: reporter,
            reported_at: now,
            scheduled_by: None,
            scheduled_at: None,
            recovered_by: None,
            recovered_at: None,
            cancelled_by: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a status transition. The new status always overwrites the
    /// old one — any status may follow any other. Side effects apply
    /// only for the target status: the actor is recorded when supplied,
    /// and the transition timestamp is set only on first entry (so
    /// re-confirming a status keeps the original time).
    pub fn update_status(&self, id: i64, req: UpdateStatusRequest) -> ApiResult<GhostNet> {
        let new_status = req
            .status
            .ok_or_else(|| ApiError::Validation("status: a new status is required".into()))?;

        let Some(row) = self.db.find_ghost_net_by_id(id)? else {
            return Err(ApiError::NotFound(format!("ghost net {} not found", id)));
        };
        let mut net = row.into_model()?;

        let old_status = net.status;
        let now = Utc::now();
        net.status = new_status;
        net.updated_at = now;

        match new_status {
            NetStatus::Scheduled => {
                if let Some(actor) = req.scheduled_by {
                    net.scheduled_by = Some(actor);
                }
                if old_status != NetStatus::Scheduled || net.scheduled_at.is_none() {
                    net.scheduled_at = Some(now);
                }
            }
            NetStatus::Recovered => {
                if let Some(actor) = req.recovered_by {
                    net.recovered_by = Some(actor);
                }
                if old_status != NetStatus::Recovered || net.recovered_at.is_none() {
                    net.recovered_at = Some(now);
                }
            }
            NetStatus::Cancelled => {
                if let Some(actor) = req.cancelled_by {
                    net.cancelled_by = Some(actor);
                }
                if old_status != NetStatus::Cancelled || net.cancelled_at.is_none() {
                    net.cancelled_at = Some(now);
                }
            }
            NetStatus::Reported => {}
        }

        self.db.update_ghost_net(&GhostNetRow::from(&net))?;

        info!(
            net_id = id,
            from = %old_status,
            to = %new_status,
            "ghost net status updated"
        );
        Ok(net)
    }
}

fn require_in_range(value: Option<f64>, min: f64, max: f64, field: &str) -> ApiResult<f64> {
    let v = value.ok_or_else(|| ApiError::Validation(format!("{}: value is required", field)))?;
    if !(min..=max).contains(&v) {
        return Err(ApiError::Validation(format!(
            "{}: {} outside allowed range [{}, {}]",
            field, v, min, max
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NetRegistry {
        NetRegistry::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn report(latitude: f64, longitude: f64) -> ReportNetRequest {
        ReportNetRequest {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    fn schedule(actor: Option<i64>) -> UpdateStatusRequest {
        UpdateStatusRequest {
            status: Some(NetStatus::Scheduled),
            scheduled_by: actor,
            ..Default::default()
        }
    }

    #[test]
    fn submit_rejects_out_of_range_coordinates() {
        let reg = registry();
        for (lat, lon) in [
            (-90.1, 0.0),
            (90.1, 0.0),
            (0.0, -180.1),
            (0.0, 180.1),
            (f64::NAN, 0.0),
        ] {
            let err = reg.submit(report(lat, lon), None).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "({}, {})", lat, lon);
        }
        // boundary values are valid
        assert!(reg.submit(report(-90.0, 180.0), None).is_ok());
        // failed submissions created nothing
        assert_eq!(reg.list().unwrap().len(), 1);
    }

    #[test]
    fn submit_rejects_missing_coordinates() {
        let reg = registry();
        let err = reg.submit(ReportNetRequest::default(), None).unwrap_err();
        match err {
            ApiError::Validation(msg) => assert!(msg.starts_with("latitude"), "{}", msg),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn submit_forces_reported_status() {
        let reg = registry();
        let req = ReportNetRequest {
            latitude: Some(10.0),
            longitude: Some(20.0),
            status: Some(NetStatus::Recovered),
            ..Default::default()
        };
        let net = reg.submit(req, None).unwrap();
        assert_eq!(net.status, NetStatus::Reported);
        assert_eq!(net.reported_by, None);
    }

    #[test]
    fn update_status_requires_status_and_existing_net() {
        let reg = registry();
        let net = reg.submit(report(1.0, 2.0), None).unwrap();

        let err = reg
            .update_status(net.id, UpdateStatusRequest::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = reg.update_status(999, schedule(Some(7))).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn rescheduling_keeps_original_timestamp_but_latest_actor() {
        let reg = registry();
        let net = reg.submit(report(1.0, 2.0), None).unwrap();

        let first = reg.update_status(net.id, schedule(Some(7))).unwrap();
        let second = reg.update_status(net.id, schedule(Some(8))).unwrap();

        assert_eq!(second.scheduled_at, first.scheduled_at);
        assert_eq!(second.scheduled_by, Some(8));
        assert!(second.updated_at >= first.updated_at);

        // re-confirming without an actor keeps the previous one
        let third = reg.update_status(net.id, schedule(None)).unwrap();
        assert_eq!(third.scheduled_by, Some(8));
        assert_eq!(third.scheduled_at, first.scheduled_at);
    }

    #[test]
    fn recovery_after_scheduling_preserves_schedule_audit() {
        let reg = registry();
        let req = ReportNetRequest {
            latitude: Some(10.0),
            longitude: Some(20.0),
            size_meters: Some(5.0),
            status: None,
        };
        let net = reg.submit(req, None).unwrap();
        assert_eq!(net.status, NetStatus::Reported);
        assert_eq!(net.reported_by, None);

        let scheduled = reg.update_status(net.id, schedule(Some(7))).unwrap();
        assert_eq!(scheduled.status, NetStatus::Scheduled);
        assert_eq!(scheduled.scheduled_by, Some(7));
        assert!(scheduled.scheduled_at.is_some());

        let recovered = reg
            .update_status(
                net.id,
                UpdateStatusRequest {
                    status: Some(NetStatus::Recovered),
                    recovered_by: Some(9),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(recovered.status, NetStatus::Recovered);
        assert_eq!(recovered.recovered_by, Some(9));
        assert!(recovered.recovered_at.is_some());
        // the schedule audit trail is untouched
        assert_eq!(recovered.scheduled_by, Some(7));
        assert_eq!(recovered.scheduled_at, scheduled.scheduled_at);
    }

    #[test]
    fn any_status_may_follow_any_other() {
        let reg = registry();
        let net = reg.submit(report(1.0, 2.0), None).unwrap();

        reg.update_status(
            net.id,
            UpdateStatusRequest {
                status: Some(NetStatus::Cancelled),
                cancelled_by: Some(3),
                ..Default::default()
            },
        )
        .unwrap();

        // CANCELLED -> SCHEDULED is permitted; cancellation audit stays
        let reopened = reg.update_status(net.id, schedule(Some(7))).unwrap();
        assert_eq!(reopened.status, NetStatus::Scheduled);
        assert_eq!(reopened.cancelled_by, Some(3));
        assert!(reopened.cancelled_at.is_some());
    }

    #[test]
    fn reporter_id_is_attributed_as_supplied() {
        let reg = registry();
        // no existence check against the user directory by design
        let net = reg.submit(report(1.0, 2.0), Some(12345)).unwrap();
        assert_eq!(net.reported_by, Some(12345));

        let reloaded = &reg.list().unwrap()[0];
        assert_eq!(reloaded.reported_by, Some(12345));
    }
}
