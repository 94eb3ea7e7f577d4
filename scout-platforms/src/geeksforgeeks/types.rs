use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `__NEXT_DATA__` payload, reduced to the path leading to the problem.
///
/// Every level defaults when absent so a partial payload still decodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextData {
    #[serde(default)]
    pub props: Props,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Props {
    #[serde(default, rename = "pageProps")]
    pub page_props: PageProps,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageProps {
    #[serde(default, rename = "initialState")]
    pub initial_state: InitialState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitialState {
    #[serde(default, rename = "problemData")]
    pub problem_data: ProblemData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemData {
    #[serde(default, rename = "allData")]
    pub all_data: AllData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllData {
    #[serde(default, rename = "probData")]
    pub prob_data: ProbData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbData {
    #[serde(default)]
    pub problem_name: Option<String>,
    /// Statement markup.
    #[serde(default)]
    pub problem_question: Option<String>,
    /// Numeric on most pages, occasionally a string.
    #[serde(default)]
    pub id: Option<Value>,
}

/// One page of the comment endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub results: Vec<RawComment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub votes: Option<Value>,
}

/// Render a scalar JSON value as an identifier; null, empty strings and
/// containers yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Vote counts arrive as numbers or numeric strings.
pub fn votes_of(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_path() {
        let data: NextData = serde_json::from_value(json!({
            "props": {"pageProps": {"initialState": {"problemData": {"allData": {"probData": {
                "problem_name": "Sample",
                "problem_question": "<p>Do X</p>",
                "id": 42
            }}}}}}
        }))
        .unwrap();
        let prob = data.props.page_props.initial_state.problem_data.all_data.prob_data;
        assert_eq!(prob.problem_name.as_deref(), Some("Sample"));
        assert_eq!(prob.id.as_ref().and_then(scalar_to_string).as_deref(), Some("42"));
    }

    #[test]
    fn missing_levels_default() {
        let data: NextData =
            serde_json::from_value(json!({"props": {"pageProps": {}}, "page": "/x"})).unwrap();
        let prob = data.props.page_props.initial_state.problem_data.all_data.prob_data;
        assert!(prob.problem_name.is_none());
        assert!(prob.problem_question.is_none());
        assert!(prob.id.is_none());
    }

    #[test]
    fn scalar_ids() {
        assert_eq!(scalar_to_string(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(scalar_to_string(&json!(7)).as_deref(), Some("7"));
        assert_eq!(scalar_to_string(&json!("  ")), None);
        assert_eq!(scalar_to_string(&json!(null)), None);
        assert_eq!(scalar_to_string(&json!({"a": 1})), None);
    }

    #[test]
    fn votes_accept_numbers_and_strings() {
        assert_eq!(votes_of(Some(&json!(3))), 3);
        assert_eq!(votes_of(Some(&json!("12"))), 12);
        assert_eq!(votes_of(Some(&json!("many"))), 0);
        assert_eq!(votes_of(None), 0);
    }
}
