/// Progress message sent by a batch worker after each station
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub station: String,
    pub worker_id: usize,
}

impl WorkerStatus {
    pub fn new(progress: f32, station: &str, worker_id: usize) -> Self {
        Self {
            progress,
            station: station.to_string(),
            worker_id,
        }
    }
}
