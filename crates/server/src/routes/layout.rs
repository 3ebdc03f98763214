use axum::Json;
use chess_core::device::{DeviceProfile, DeviceSignal, Layout};
use serde::Serialize;

#[derive(Serialize)]
pub struct LayoutResponse {
    pub device: DeviceProfile,
    pub layout: Layout,
}

/// POST /api/layout
/// Classify the client from what it reports and pick the board arrangement.
pub async fn layout(Json(signal): Json<DeviceSignal>) -> Json<LayoutResponse> {
    let device = DeviceProfile::detect(&signal);
    let layout = Layout::for_profile(&device, signal.viewport);
    Json(LayoutResponse { device, layout })
}
