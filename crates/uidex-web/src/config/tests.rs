#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3001");
        assert_eq!(config.search.page_size, 20);
        assert_eq!(config.harvest.max_concurrent_sources, 4);
        assert_eq!(config.harvest.sitemap.max_depth, 4);
        assert_eq!(config.fetch.timeout_secs, 20);
        assert_eq!(config.moderation.queue.seed_score, 50);
        assert!(config.moderation.admin_token.is_none());
        assert!(!config.harvest.preserve_moderated);
    }

    #[test]
    fn test_no_rules_means_builtin_rules() {
        let config = Config::default();
        assert_eq!(config.rules().len(), uidex_ingestion::targets::default_rules().len());
    }

    #[test]
    fn test_sections_and_rules_parse() {
        let raw = r#"
            [server]
            bind = "0.0.0.0:8080"

            [storage]
            persist = false

            [harvest]
            preserve_moderated = true
            selector_score = 70

            [harvest.sitemap]
            max_documents = 50

            [moderation]
            default_framework = "Vue"
            admin_token = "letmein"

            [[rules]]
            kind = "selector"
            library = "DaisyUI"
            index_url = "https://daisyui.com/components/button/"
            base_domain = "https://daisyui.com"
            framework = "CSS"
            selector = "div.drawer-side a[href^='/components/']"
            clean = [{ step = "strip_symbols" }]
        "#;
        let config = Config::from_toml(raw).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(!config.storage.persist);
        assert!(config.harvest.preserve_moderated);
        assert_eq!(config.harvest.selector_score, 70);
        assert_eq!(config.harvest.sitemap.max_documents, 50);
        assert_eq!(config.harvest.sitemap.max_depth, 4);
        assert_eq!(config.moderation.queue.default_framework, "Vue");
        assert_eq!(config.moderation.admin_token.as_deref(), Some("letmein"));
        assert_eq!(config.rules().len(), 1);
        assert_eq!(config.rules()[0].library(), "DaisyUI");
    }

    #[test]
    fn test_invalid_rule_is_rejected_at_load() {
        let raw = r#"
            [[rules]]
            kind = "selector"
            library = "Broken"
            index_url = "https://broken.test/"
            base_domain = "https://broken.test"
            framework = "React"
            selector = "a[["
        "#;
        assert!(Config::from_toml(raw).is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from("/definitely/not/here/uidex.toml").unwrap();
        assert!(config.rules.is_empty());
    }
}
