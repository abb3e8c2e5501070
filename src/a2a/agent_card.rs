use serde::{Deserialize, Serialize};

/// Content types accepted and produced by the agent.
pub const SUPPORTED_CONTENT_TYPES: [&str; 2] = ["text", "text/plain"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub push_notifications: bool,
    pub state_transition_history: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
}

/// Self-description served at `/.well-known/agent.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub capabilities: AgentCapabilities,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    /// The card of the research agent reachable at `url`.
    pub fn research_agent(url: impl Into<String>) -> Self {
        let modes: Vec<String> = SUPPORTED_CONTENT_TYPES.iter().map(|m| m.to_string()).collect();

        Self {
            name: "Research Agent".to_string(),
            description: "A research assistant that searches the web for information on any \
                          topic and provides concise summaries with cited sources."
                .to_string(),
            url: url.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: modes.clone(),
            default_output_modes: modes,
            skills: vec![AgentSkill {
                id: "web_researcher".to_string(),
                name: "Web Researcher".to_string(),
                description: "Research topics on the web using DuckDuckGo search and provide \
                              summaries with relevant information and sources."
                    .to_string(),
                tags: vec![
                    "research".to_string(),
                    "web search".to_string(),
                    "information gathering".to_string(),
                ],
                examples: vec![
                    "Research the latest developments in quantum computing".to_string(),
                    "Find information about climate change solutions".to_string(),
                    "Gather data on renewable energy trends".to_string(),
                ],
            }],
        }
    }
}

/// Whether a client's accepted output modes include one we can produce.
/// An absent or empty list accepts anything.
pub fn are_modalities_compatible(accepted: Option<&[String]>) -> bool {
    match accepted {
        None => true,
        Some([]) => true,
        Some(modes) => modes
            .iter()
            .any(|m| SUPPORTED_CONTENT_TYPES.contains(&m.as_str())),
    }
}
