/// Session parameters handed to a launched client.
///
/// Every field is optional. Absent or empty fields are never forwarded to the
/// launch endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchSession {
    /// Game session id issued by the account service.
    pub session_id: Option<String>,
    /// Character (game account) id to log in as.
    pub character_id: Option<String>,
    /// Display name of the selected character.
    pub display_name: Option<String>,
}

impl LaunchSession {
    /// Build a session from its three parts.
    pub fn new(
        session_id: Option<String>,
        character_id: Option<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            session_id,
            character_id,
            display_name,
        }
    }

    /// Query pairs for the non-empty fields, in a fixed order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("jx_session_id", self.session_id.as_deref()),
            ("jx_character_id", self.character_id.as_deref()),
            ("jx_display_name", self.display_name.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
    }
}
