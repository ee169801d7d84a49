//! Prompt construction and reply parsing for wait-time estimates

use erwait_core::{EnvironmentalContext, Hospital};
use serde::Deserialize;

/// Fields the model is asked to return.
#[derive(Debug, Clone, PartialEq)]
pub struct AiEstimate {
    pub wait_minutes: u32,
    pub confidence: u8,
    pub factors: Vec<String>,
    pub reasoning: Option<String>,
}

/// Outcome of parsing a model reply. Unparseable text is a routine
/// condition here, not an error: the caller branches to the
/// deterministic heuristic.
#[derive(Debug, Clone, PartialEq)]
pub enum AiReply {
    Parsed(AiEstimate),
    Unparseable,
}

/// Raw reply shape before validation. Numbers arrive as floats often
/// enough that parsing them as integers directly loses replies.
#[derive(Deserialize)]
struct RawEstimate {
    wait_time: f64,
    confidence: Option<f64>,
    #[serde(default)]
    factors: Vec<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

const MIN_WAIT_MINUTES: f64 = 5.0;
const MAX_WAIT_MINUTES: f64 = 300.0;
const DEFAULT_CONFIDENCE: f64 = 75.0;

/// Build the estimation prompt for one hospital under the current
/// conditions. `utilization` is the deterministic capacity estimate
/// in 0..1.
pub fn build_prompt(
    hospital: &Hospital,
    utilization: f64,
    ctx: &EnvironmentalContext,
) -> String {
    format!(
        r#"You are an expert emergency room wait time predictor. Analyze the following data and predict the current wait time for {name}:

HOSPITAL INFORMATION:
- Name: {name}
- Hospital Type: {class}
- Rating: {rating:.1} ({ratings_total} reviews)
- Distance from user: {distance:.1} miles
- Estimated capacity utilization: {utilization:.0}%

WEATHER CONDITIONS:
- Condition: {condition}
- Temperature: {temperature:.1}C
- Precipitation: {precipitation:.1}mm
- Wind Speed: {wind:.1} m/s

TRAFFIC CONDITIONS:
- Traffic Level: {traffic:?}
- Delay Ratio: {delay:.0}%

TIME FACTORS:
- Current Hour: {hour}
- Day of Week: {weekday} (0=Monday, 6=Sunday)
- Peak Hours: 8-10am, 6-8pm

ANALYSIS REQUIREMENTS:
1. Consider hospital type and size (medical centers vs community hospitals vs clinics)
2. Factor in weather impact (storms increase accidents, extreme weather affects ER volume)
3. Account for traffic patterns (rush hour increases accidents)
4. Consider time of day and day of week patterns
5. Analyze capacity utilization based on hospital characteristics

Provide your analysis and predict the current wait time in minutes.
Consider all factors and provide a realistic estimate between 5-300 minutes.

Respond with ONLY a JSON object in this format:
{{"wait_time": <number>, "confidence": <number 0-100>, "factors": ["factor1", "factor2", "factor3"], "reasoning": "Brief explanation of your analysis"}}"#,
        name = hospital.name,
        class = hospital.classify().label(),
        rating = hospital.rating,
        ratings_total = hospital.user_ratings_total,
        distance = hospital.distance_miles,
        utilization = utilization * 100.0,
        condition = ctx.weather.condition,
        temperature = ctx.weather.temperature_c,
        precipitation = ctx.weather.precipitation_mm,
        wind = ctx.weather.wind_speed_ms,
        traffic = ctx.traffic.level,
        delay = ctx.traffic.delay_ratio * 100.0,
        hour = ctx.hour,
        weekday = ctx.weekday,
    )
}

/// Parse a model reply into a validated estimate. A wait outside
/// 5-300 minutes is treated the same as malformed text.
pub fn parse_reply(text: &str) -> AiReply {
    let Some(json_str) = extract_json(text) else {
        return AiReply::Unparseable;
    };

    let Ok(raw) = serde_json::from_str::<RawEstimate>(&json_str) else {
        return AiReply::Unparseable;
    };

    if !raw.wait_time.is_finite()
        || raw.wait_time < MIN_WAIT_MINUTES
        || raw.wait_time > MAX_WAIT_MINUTES
    {
        return AiReply::Unparseable;
    }

    let confidence = raw
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 100.0);

    AiReply::Parsed(AiEstimate {
        wait_minutes: raw.wait_time.round() as u32,
        confidence: confidence.round() as u8,
        factors: raw.factors,
        reasoning: raw.reasoning,
    })
}

/// Extract a JSON object from text that might wrap it in markdown code
/// fences or prose.
fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return Some(trimmed.to_string());
    }

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return Some(after[..end].trim().to_string());
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return Some(after[..end].trim().to_string());
        }
    }

    // A reply that narrates around the object: take the outermost braces.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end > start {
        return Some(trimmed[start..=end].to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json_reply() {
        let reply = r#"{"wait_time": 45, "confidence": 85, "factors": ["Peak hours"], "reasoning": "Busy evening"}"#;
        match parse_reply(reply) {
            AiReply::Parsed(est) => {
                assert_eq!(est.wait_minutes, 45);
                assert_eq!(est.confidence, 85);
                assert_eq!(est.factors, vec!["Peak hours"]);
            }
            AiReply::Unparseable => panic!("expected parsed reply"),
        }
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = "Here is my estimate:\n```json\n{\"wait_time\": 70.0, \"confidence\": 60}\n```";
        match parse_reply(reply) {
            AiReply::Parsed(est) => {
                assert_eq!(est.wait_minutes, 70);
                assert_eq!(est.confidence, 60);
                assert!(est.factors.is_empty());
            }
            AiReply::Unparseable => panic!("expected parsed reply"),
        }
    }

    #[test]
    fn parses_reply_wrapped_in_prose() {
        let reply = "Based on the data, {\"wait_time\": 25, \"confidence\": 90, \"factors\": []} is my answer.";
        assert!(matches!(parse_reply(reply), AiReply::Parsed(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_reply("I cannot estimate this."), AiReply::Unparseable);
        assert_eq!(parse_reply(""), AiReply::Unparseable);
        assert_eq!(parse_reply("{\"confidence\": 80}"), AiReply::Unparseable);
    }

    #[test]
    fn rejects_out_of_range_waits() {
        assert_eq!(
            parse_reply("{\"wait_time\": 2, \"confidence\": 80}"),
            AiReply::Unparseable
        );
        assert_eq!(
            parse_reply("{\"wait_time\": 900, \"confidence\": 80}"),
            AiReply::Unparseable
        );
    }

    #[test]
    fn missing_confidence_gets_default() {
        match parse_reply("{\"wait_time\": 40}") {
            AiReply::Parsed(est) => assert_eq!(est.confidence, 75),
            AiReply::Unparseable => panic!("expected parsed reply"),
        }
    }

    #[test]
    fn prompt_mentions_hospital_and_conditions() {
        let hospital = Hospital {
            id: "h1".to_string(),
            name: "Regional Medical Center".to_string(),
            address: "100 Main St".to_string(),
            latitude: 40.71,
            longitude: -74.0,
            phone: None,
            website: None,
            rating: 4.2,
            user_ratings_total: 120,
            capacity: 100,
            distance_miles: 2.3,
            distance_km: 3.7,
            drive_minutes: 6,
            source: "seed".to_string(),
        };
        let ctx = EnvironmentalContext::neutral(9, 1);
        let prompt = build_prompt(&hospital, 0.75, &ctx);
        assert!(prompt.contains("Regional Medical Center"));
        assert!(prompt.contains("Medical Center"));
        assert!(prompt.contains("clear"));
        assert!(prompt.contains("wait_time"));
    }
}
