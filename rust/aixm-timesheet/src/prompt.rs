//! Instruction template for language-model backends.

/// Placeholder replaced by the schedule text.
const TEXT_SLOT: &str = "{schedule_text}";

const TEMPLATE: &str = r#"You are an assistant that converts textual schedule descriptions into a structured JSON format
for AIXM 5.1.1 Timesheets. Each schedule period must include the following keys:
- timeReference: always "UTC"
- startDate: "01-01" (unless specified otherwise)
- endDate: "31-12" (unless specified otherwise)
- day: a string representing the day or day group (e.g., "WORK DAY" for Monday to Friday, "SAT" for Saturday, "EVERY DAY" for all days)
- startTime: time in "HH:MM" format (e.g., "08:00")
- endTime: time in "HH:MM" format (e.g., "18:00")

Respond with the JSON array only, without commentary.

Examples:
Text: "MON-FRI: 0800-1800, SAT: 0800-1200"
Output:
[
    {"timeReference": "UTC", "startDate": "01-01", "endDate": "31-12", "day": "WORK DAY", "startTime": "08:00", "endTime": "18:00"},
    {"timeReference": "UTC", "startDate": "01-01", "endDate": "31-12", "day": "SAT", "startTime": "08:00", "endTime": "12:00"}
]

Text: "Every day from 0900 to 1700"
Output:
[
    {"timeReference": "UTC", "startDate": "01-01", "endDate": "31-12", "day": "EVERY DAY", "startTime": "09:00", "endTime": "17:00"}
]

Now, convert the following text into a JSON list of objects:
{schedule_text}
"#;

/// Build the extraction prompt for `text`.
pub fn schedule_prompt(text: &str) -> String {
    TEMPLATE.replacen(TEXT_SLOT, text, 1)
}
