//! Media capture controller tests: constraint relaxation, manual retry and
//! cancellation of a pending acquisition.

mod helpers;

use helpers::fakes::{DeviceOutcome, FakeDevices};
use sprout_common::config::FacingMode;
use sprout_studio::capture::{CaptureController, MediaConstraints, VideoConstraint};
use sprout_studio::error::DeviceError;
use tokio_util::sync::CancellationToken;

fn unsatisfiable() -> DeviceOutcome {
    DeviceOutcome::Fail(DeviceError::ConstraintUnsatisfiable(
        "OverconstrainedError: facingMode".to_string(),
    ))
}

#[tokio::test]
async fn test_environment_rejection_retries_generic_once_then_succeeds() {
    let devices = FakeDevices::scripted(vec![unsatisfiable()], vec![]);
    let controller = CaptureController::new(devices.clone(), FacingMode::Environment);

    let handle = controller.acquire(&CancellationToken::new()).await.unwrap();

    assert!(handle.is_relaxed());
    assert_eq!(
        devices.requests(),
        vec![
            MediaConstraints::preferred(FacingMode::Environment),
            MediaConstraints::relaxed(),
        ]
    );
}

#[tokio::test]
async fn test_environment_rejection_twice_is_unavailable() {
    let devices = FakeDevices::scripted(vec![unsatisfiable(), unsatisfiable()], vec![]);
    let controller = CaptureController::new(devices.clone(), FacingMode::Environment);

    let err = controller.acquire(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, DeviceError::DeviceUnavailable(ref detail) if detail.contains("facingMode")));
    assert_eq!(devices.opens(), 2);
    assert_eq!(devices.releases(), 0);
}

#[tokio::test]
async fn test_unavailable_on_first_attempt_is_not_retried() {
    let devices = FakeDevices::scripted(
        vec![DeviceOutcome::Fail(DeviceError::DeviceUnavailable(
            "NotReadableError: device in use".to_string(),
        ))],
        vec![],
    );
    let controller = CaptureController::new(devices.clone(), FacingMode::User);

    let err = controller.acquire(&CancellationToken::new()).await.unwrap_err();
    assert_eq!(
        err,
        DeviceError::DeviceUnavailable("NotReadableError: device in use".to_string())
    );
    assert_eq!(devices.opens(), 1);
}

#[tokio::test]
async fn test_manual_retry_after_denial_uses_generic_constraint() {
    let devices = FakeDevices::scripted(
        vec![DeviceOutcome::Fail(DeviceError::PermissionDenied(
            "NotAllowedError".to_string(),
        ))],
        vec![],
    );
    let controller = CaptureController::new(devices.clone(), FacingMode::Environment);
    let cancel = CancellationToken::new();

    let err = controller.acquire(&cancel).await.unwrap_err();
    assert!(matches!(err, DeviceError::PermissionDenied(_)));
    assert_eq!(devices.opens(), 1);

    let handle = controller.acquire_relaxed(&cancel).await.unwrap();
    assert!(handle.is_relaxed());

    let requests = devices.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].video, VideoConstraint::Facing(FacingMode::Environment));
    assert_eq!(requests[1].video, VideoConstraint::Any);
}

#[tokio::test]
async fn test_navigate_away_abandons_pending_acquisition() {
    let devices = FakeDevices::scripted(vec![DeviceOutcome::Hang], vec![]);
    let controller = CaptureController::new(devices.clone(), FacingMode::Environment);
    let cancel = CancellationToken::new();

    let (result, _) = tokio::join!(controller.acquire(&cancel), async {
        tokio::task::yield_now().await;
        cancel.cancel();
    });

    assert_eq!(result.unwrap_err(), DeviceError::Cancelled);
    assert_eq!(devices.opens(), 1);
    assert_eq!(devices.releases(), 0);
}

#[tokio::test]
async fn test_handle_release_is_idempotent() {
    let devices = FakeDevices::granting(vec![]);
    let controller = CaptureController::new(devices.clone(), FacingMode::Environment);

    let mut handle = controller.acquire(&CancellationToken::new()).await.unwrap();
    assert!(!handle.is_released());
    assert!(handle.release());
    assert!(handle.is_released());
    assert!(!handle.release());
    drop(handle);

    assert_eq!(devices.releases(), 1);
}
