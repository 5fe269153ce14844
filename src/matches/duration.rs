pub const TICKS_PER_SECOND: u64 = 10;

// Minutes never roll over into hours.
pub fn ticks_to_time(ticks: u64) -> String {
    let total_seconds = ticks / TICKS_PER_SECOND;
    let minutes = total_seconds / 60;
    let seconds = total_seconds - minutes * 60;

    format!("{minutes:02}:{seconds:02}")
}
