//! Built-in extraction rules, used when the config file names none.

use uidex_db::Framework;

use crate::rules::{ExtractionRule, NameStep, SelectorRule, SitemapRule, UrlFilter};

fn selector(
    library: &str,
    index_url: &str,
    base_domain: &str,
    framework: Framework,
    selector: &str,
    clean: Vec<NameStep>,
) -> ExtractionRule {
    ExtractionRule::Selector(SelectorRule {
        library: library.to_string(),
        index_url: index_url.to_string(),
        base_domain: base_domain.to_string(),
        framework,
        selector: selector.to_string(),
        clean,
        popularity: None,
    })
}

fn sitemap(library: &str, sitemap_url: &str, include: &str, extract: Vec<NameStep>) -> ExtractionRule {
    ExtractionRule::Sitemap(SitemapRule {
        library: library.to_string(),
        sitemap_url: sitemap_url.to_string(),
        framework: Framework::React,
        filter: UrlFilter {
            include: vec![include.to_string()],
            exclude: vec!["/api/".to_string()],
        },
        extract,
        clean: vec![],
        popularity: None,
    })
}

pub fn default_selector_rules() -> Vec<ExtractionRule> {
    use Framework::{Css, React, Vue};
    vec![
        // React
        selector("Tamagui", "https://tamagui.dev/ui/button", "https://tamagui.dev", React,
            "a[href^='/ui/']", vec![]),
        selector("Aceternity UI", "https://ui.aceternity.com/components", "https://ui.aceternity.com", React,
            "a[href^='/components/']", vec![]),
        selector("Tremor", "https://www.tremor.so/docs/visualizations/area-chart", "https://www.tremor.so", React,
            "a[href^='/docs/visualizations/'], a[href^='/docs/inputs/'], a[href^='/docs/ui/']", vec![]),
        selector("Radix Themes", "https://www.radix-ui.com/themes/docs/overview/getting-started", "https://www.radix-ui.com", React,
            "a[href^='/themes/docs/components/'], a[href^='/themes/docs/layout/'], a[href^='/themes/docs/typography/']", vec![]),
        selector("HeroUI", "https://www.heroui.com/docs/components/accordion", "https://www.heroui.com", React,
            "a[href^='/docs/components/']", vec![]),
        selector("MUI Joy UI", "https://mui.com/joy-ui/react-autocomplete/", "https://mui.com", React,
            "a[href*='/joy-ui/react-']", vec![]),
        selector("Headless UI", "https://headlessui.com/react/menu", "https://headlessui.com", React,
            "ul a[href^='/react/']", vec![]),
        selector("Mantine", "https://mantine.dev/core/package/", "https://mantine.dev", React,
            "a[href^='/core/']", vec![NameStep::StripSuffix { suffix: " component".into() }]),
        selector("ShadCN UI", "https://ui.shadcn.com/docs/components", "https://ui.shadcn.com", React,
            "div.grid a[href^='/docs/components/']", vec![]),
        selector("Material UI", "https://mui.com/material-ui/all-components/", "https://mui.com", React,
            "a[href*='/material-ui/react-']", vec![]),
        selector("Ant Design", "https://ant.design/components/overview/", "https://ant.design", React,
            ".ant-row a[href*='/components/']", vec![NameStep::SplitCamelCase]),
        selector("Chakra UI", "https://v2.chakra-ui.com/docs/components", "https://v2.chakra-ui.com", React,
            "a[href*='/docs/components/']", vec![]),
        // CSS / Tailwind
        selector("HyperUI", "https://www.hyperui.dev/", "https://www.hyperui.dev", Css,
            "a[href^='/components/']", vec![NameStep::StripCountPrefix, NameStep::StripSymbols]),
        selector("Flowbite", "https://flowbite.com/docs/components/accordion/", "https://flowbite.com", Css,
            "aside a[href^='/docs/components/']", vec![]),
        selector("DaisyUI", "https://daisyui.com/components/button/", "https://daisyui.com", Css,
            "div.drawer-side a[href^='/components/']", vec![]),
        // Vue
        selector("Headless UI (Vue)", "https://headlessui.com/v1/vue/menu", "https://headlessui.com", Vue,
            "a[href^='/v1/vue/']", vec![NameStep::StripParenthetical]),
    ]
}

pub fn default_sitemap_rules() -> Vec<ExtractionRule> {
    vec![
        sitemap("Material UI", "https://mui.com/sitemap.xml", "/material-ui/react-",
            vec![NameStep::Capture { pattern: r"/react-([a-z0-9-]+)/?$".into() }, NameStep::SlugToTitle]),
        sitemap("ShadCN UI", "https://ui.shadcn.com/sitemap.xml", "/docs/components/",
            vec![NameStep::After { marker: "/docs/components/".into() }, NameStep::SlugToTitle]),
        sitemap("Radix UI", "https://www.radix-ui.com/sitemap.xml", "/primitives/docs/components/",
            vec![NameStep::After { marker: "/components/".into() }, NameStep::SlugToTitle]),
        sitemap("Mantine", "https://mantine.dev/sitemap.xml", "/core/",
            vec![NameStep::Segment { from_end: 0 }, NameStep::SlugToTitle]),
    ]
}

/// Every built-in rule: selector rules first, then sitemap rules.
pub fn default_rules() -> Vec<ExtractionRule> {
    let mut rules = default_selector_rules();
    rules.extend(default_sitemap_rules());
    rules
}
