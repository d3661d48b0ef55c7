const GREETINGS: [&str; 6] = ["hello", "hi", "hey", "greetings", "good morning", "good evening"];

/// True when the lower-cased message contains any greeting word anywhere,
/// including inside other words ("this" contains "hi").
pub fn is_greeting(message: &str) -> bool {
    let message = message.to_lowercase();
    GREETINGS.iter().any(|greeting| message.contains(greeting))
}

pub fn time_based_greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning! How can I assist you today?"
    } else if hour < 18 {
        "Good afternoon! How may I help you today?"
    } else {
        "Good evening! How can I be of service to you today?"
    }
}
