use anyhow::{Context, anyhow};
use picnarrate_core::types::{FALLBACK_DESCRIPTION, UploadResult};
use serde_json::{Map, Value};

type Object = Map<String, Value>;
type Strategy = fn(&Object) -> Option<&str>;

// Compatibility shim: the upload endpoint has answered with more than one shape over time.
// Strategies run in order and the first non-empty string wins.
const DESCRIPTION_STRATEGIES: &[Strategy] = &[flat_description, nested_description];
const AUDIO_STRATEGIES: &[Strategy] = &[flat_audio_path, nested_mp3_path];

fn flat_description(o: &Object) -> Option<&str> {
    o.get("description")?.as_str()
}

fn nested_description(o: &Object) -> Option<&str> {
    o.get("process_response")?.get("description")?.as_str()
}

fn flat_audio_path(o: &Object) -> Option<&str> {
    o.get("audio_path")?.as_str()
}

fn nested_mp3_path(o: &Object) -> Option<&str> {
    o.get("audio_response")?
        .get("audio_paths")?
        .get("mp3")?
        .as_str()
}

fn first_match<'a>(o: &'a Object, strategies: &[Strategy]) -> Option<&'a str> {
    strategies
        .iter()
        .filter_map(|s| s(o))
        .find(|v| !v.trim().is_empty())
}

/// Missing fields are substituted, not errors. Only an uninterpretable root fails.
pub fn parse_upload_response(body: &[u8]) -> anyhow::Result<UploadResult> {
    let root: Value = serde_json::from_slice(body).context("decode upload JSON")?;
    let obj = root
        .as_object()
        .ok_or_else(|| anyhow!("upload response root is not an object"))?;

    let description = first_match(obj, DESCRIPTION_STRATEGIES)
        .unwrap_or(FALLBACK_DESCRIPTION)
        .to_string();
    let audio = first_match(obj, AUDIO_STRATEGIES)
        .unwrap_or_default()
        .to_string();

    Ok(UploadResult { description, audio })
}

pub fn parse_recordings_listing(body: &[u8]) -> anyhow::Result<Vec<String>> {
    let urls: Vec<String> =
        serde_json::from_slice(body).context("decode recordings listing JSON")?;
    Ok(urls)
}

#[derive(Debug, serde::Deserialize)]
struct OutputPathResponse {
    #[serde(default)]
    audio_path: Option<String>,
}

pub fn parse_output_path(body: &[u8]) -> anyhow::Result<String> {
    let resp: OutputPathResponse =
        serde_json::from_slice(body).context("decode output path JSON")?;
    Ok(resp.audio_path.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> UploadResult {
        parse_upload_response(s.as_bytes()).unwrap()
    }

    #[test]
    fn accepts_flat_shape() {
        let r = parse(r#"{"description":"x","audio_path":"y"}"#);
        assert_eq!(r.description, "x");
        assert_eq!(r.audio, "y");
    }

    #[test]
    fn accepts_nested_shape() {
        let r = parse(
            r#"{"process_response":{"description":"x"},"audio_response":{"audio_paths":{"mp3":"y","wav":"z"}}}"#,
        );
        assert_eq!(r.description, "x");
        assert_eq!(r.audio, "y");
    }

    #[test]
    fn empty_object_falls_back_without_error() {
        let r = parse("{}");
        assert_eq!(r.description, FALLBACK_DESCRIPTION);
        assert_eq!(r.audio, "");
    }

    #[test]
    fn blank_flat_field_defers_to_nested_one() {
        let r = parse(r#"{"description":"","process_response":{"description":"nested"}}"#);
        assert_eq!(r.description, "nested");
    }

    #[test]
    fn mixed_shapes_pick_per_field() {
        let r = parse(r#"{"description":"flat","audio_response":{"audio_paths":{"mp3":"a.mp3"}}}"#);
        assert_eq!(r.description, "flat");
        assert_eq!(r.audio, "a.mp3");
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(parse_upload_response(b"[1,2]").is_err());
        assert!(parse_upload_response(b"\"text\"").is_err());
        assert!(parse_upload_response(b"null").is_err());
        assert!(parse_upload_response(b"not json").is_err());
    }

    #[test]
    fn wrong_typed_fields_are_treated_as_absent() {
        let r = parse(r#"{"description":42,"audio_path":{"mp3":"x"}}"#);
        assert_eq!(r.description, FALLBACK_DESCRIPTION);
        assert_eq!(r.audio, "");
    }

    #[test]
    fn parses_listing_in_order() {
        let urls = parse_recordings_listing(br#"["b.mp3","a.mp3"]"#).unwrap();
        assert_eq!(urls, vec!["b.mp3".to_string(), "a.mp3".to_string()]);
        assert!(parse_recordings_listing(b"[]").unwrap().is_empty());
        assert!(parse_recordings_listing(br#"{"items":[]}"#).is_err());
    }

    #[test]
    fn parses_output_path() {
        assert_eq!(parse_output_path(br#"{"audio_path":"out.mp3"}"#).unwrap(), "out.mp3");
        assert_eq!(parse_output_path(b"{}").unwrap(), "");
        assert!(parse_output_path(b"\"out.mp3\"").is_err());
    }
}
