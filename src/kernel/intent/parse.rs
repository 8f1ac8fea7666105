use super::types::{AlarmTime, DayPeriod};
use crate::kernel::text::{find_captures, is_match};

/// Fallback timer length when nothing numeric was said.
pub const DEFAULT_TIMER_SECS: u32 = 300;

// `saniye` must be tried before `sa`, otherwise seconds read as hours.
pattern!(DURATION_PART, r"(\d+(?:[.,]\d+)?)\s*(saniye|saat|sa|dakika|dak|dk|sn)");
pattern!(BARE_NUMBER, r"\d+");
pattern!(CLOCK, r"(\d{1,2})(?:[:.](\d{2}))?");
pattern!(PM_WORDS, r"akşam|gece|öğleden\s*sonra|\bpm\b");
pattern!(AM_WORDS, r"sabah|öğleden\s*önce|\bam\b");

/// Sums every `<number> <unit>` fragment into seconds.
///
/// "10 dakika 30 saniye" -> 630. A bare number counts as minutes; no number
/// at all (or a zero total) gives [`DEFAULT_TIMER_SECS`].
pub fn parse_duration(text: &str) -> u32 {
    let mut total = 0f64;
    if let Some(re) = DURATION_PART.as_ref() {
        for caps in re.captures_iter(text) {
            let amount: f64 = caps[1].replace(',', ".").parse().unwrap_or(0.0);
            let unit_secs = match &caps[2] {
                "saat" | "sa" => 3600.0,
                "dakika" | "dak" | "dk" => 60.0,
                _ => 1.0,
            };
            total += amount * unit_secs;
        }
    }

    let mut seconds = total.round() as u32;
    if seconds == 0 {
        seconds = BARE_NUMBER
            .as_ref()
            .and_then(|re| re.find(text))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map(|minutes| minutes.saturating_mul(60))
            .unwrap_or(0);
    }
    if seconds == 0 {
        DEFAULT_TIMER_SECS
    } else {
        seconds
    }
}

/// Finds the first `H[:MM]` and the day period implied by nearby words.
///
/// Both or neither period words present means no adjustment. An hour above 23
/// or minute above 59 leaves the time unset.
pub fn parse_alarm_time(text: &str) -> (Option<AlarmTime>, Option<DayPeriod>) {
    let time = find_captures(&CLOCK, text).and_then(|caps| {
        let hour: u8 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u8 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        (hour <= 23 && minute <= 59).then_some(AlarmTime { hour, minute })
    });

    let period = match (is_match(&PM_WORDS, text), is_match(&AM_WORDS, text)) {
        (true, false) => Some(DayPeriod::Pm),
        (false, true) => Some(DayPeriod::Am),
        _ => None,
    };

    (time, period)
}
