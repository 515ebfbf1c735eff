use crate::agents::config::{AgentConfig, TeamConfig};

/// The fixed set of personas. Pure data assembly: no runtime parameters
/// beyond the model id, no error conditions, read access only.
pub struct AgentRegistry {
    web: AgentConfig,
    news: AgentConfig,
    finance: AgentConfig,
    team: TeamConfig,
}

impl AgentRegistry {
    pub fn new(model: &str) -> Self {
        let web = AgentConfig {
            name: "Web Agent".to_string(),
            role: Some("search the web for information".to_string()),
            description: None,
            model: model.to_string(),
            tool_names: vec!["web_search".to_string()],
            instructions: vec!["Always include the sources".to_string()],
            show_tool_calls: true,
            markdown: true,
            debug_mode: false,
        };

        let news = AgentConfig {
            name: "G Agent".to_string(),
            role: None,
            description: Some(
                "You are a news agent that helps users find the latest news.".to_string(),
            ),
            model: model.to_string(),
            tool_names: vec!["news_search".to_string()],
            instructions: vec![
                "Given a topic by the user, respond with 4 latest news items about that topic."
                    .to_string(),
                "Search for 10 news items and select the top 4 unique items.".to_string(),
                "Search in English and in French.".to_string(),
            ],
            show_tool_calls: true,
            markdown: false,
            debug_mode: true,
        };

        let finance = AgentConfig {
            name: "Finance Agent".to_string(),
            role: Some("Get financial data".to_string()),
            description: None,
            model: model.to_string(),
            tool_names: vec![
                "stock_price".to_string(),
                "analyst_recommendations".to_string(),
                "stock_fundamentals".to_string(),
                "company_info".to_string(),
            ],
            instructions: vec!["Use tables to display data".to_string()],
            show_tool_calls: true,
            markdown: true,
            debug_mode: false,
        };

        let team = TeamConfig {
            members: vec![news.clone(), finance.clone()],
            model: model.to_string(),
            instructions: vec![
                "Always include sources".to_string(),
                "Use tables to display data".to_string(),
            ],
            show_tool_calls: true,
            markdown: true,
        };

        AgentRegistry {
            web,
            news,
            finance,
            team,
        }
    }

    pub fn web(&self) -> &AgentConfig {
        &self.web
    }

    pub fn news(&self) -> &AgentConfig {
        &self.news
    }

    pub fn finance(&self) -> &AgentConfig {
        &self.finance
    }

    pub fn team(&self) -> &TeamConfig {
        &self.team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personas_are_fully_specified() {
        let registry = AgentRegistry::new("qwen/qwen3-32b");

        let web = registry.web();
        assert_eq!(web.name, "Web Agent");
        assert_eq!(web.tool_names, vec!["web_search"]);
        assert!(web.markdown);
        assert!(!web.debug_mode);

        let news = registry.news();
        assert_eq!(news.name, "G Agent");
        assert_eq!(news.tool_names, vec!["news_search"]);
        assert_eq!(news.instructions.len(), 3);
        assert!(news.debug_mode);

        let finance = registry.finance();
        assert_eq!(finance.name, "Finance Agent");
        assert_eq!(
            finance.tool_names,
            vec![
                "stock_price",
                "analyst_recommendations",
                "stock_fundamentals",
                "company_info"
            ]
        );
    }

    #[test]
    fn test_team_bundles_news_and_finance_in_order() {
        let registry = AgentRegistry::new("qwen/qwen3-32b");
        let team = registry.team();
        assert_eq!(team.members.len(), 2);
        assert_eq!(team.members[0].name, "G Agent");
        assert_eq!(team.members[1].name, "Finance Agent");
        assert_eq!(
            team.instructions,
            vec!["Always include sources", "Use tables to display data"]
        );
    }

    #[test]
    fn test_model_id_propagates_to_every_persona() {
        let registry = AgentRegistry::new("some/other-model");
        assert_eq!(registry.web().model, "some/other-model");
        assert_eq!(registry.news().model, "some/other-model");
        assert_eq!(registry.finance().model, "some/other-model");
        assert_eq!(registry.team().model, "some/other-model");
    }
}
