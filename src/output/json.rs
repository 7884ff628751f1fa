use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::assessment::ScoreResult;
    use crate::output::json::render_json;

    #[test]
    fn scores_render_as_numbers() {
        let scores = ScoreResult::default().with_section("IMPACT", 80);
        let rendered = render_json(&scores).expect("render json");
        let parsed: Value = serde_json::from_str(&rendered).expect("valid json");
        assert!(parsed["sections"]["IMPACT"].is_number());
        assert!(parsed["overall"].is_number());
    }
}
