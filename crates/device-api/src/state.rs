use application::DeviceService;

pub struct AppState {
    pub devices: DeviceService,
}

impl AppState {
    pub fn new(devices: DeviceService) -> Self {
        Self { devices }
    }
}
