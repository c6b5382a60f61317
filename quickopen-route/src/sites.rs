//! Static table of site names people type instead of URLs.

/// `(alias, canonical home URL)`; aliases are lowercase and
/// whitespace-normalised.
const WELL_KNOWN_SITES: &[(&str, &str)] = &[
    ("hacker news", "https://news.ycombinator.com/"),
    ("hn", "https://news.ycombinator.com/"),
    ("hackernews", "https://news.ycombinator.com/"),
    ("reddit", "https://www.reddit.com/"),
    ("twitter", "https://twitter.com/"),
    ("x", "https://x.com/"),
    ("youtube", "https://www.youtube.com/"),
    ("google", "https://www.google.com/"),
    ("facebook", "https://www.facebook.com/"),
    ("instagram", "https://www.instagram.com/"),
    ("linkedin", "https://www.linkedin.com/"),
    ("github", "https://github.com/"),
    ("stackoverflow", "https://stackoverflow.com/"),
    ("stack overflow", "https://stackoverflow.com/"),
    ("npm", "https://www.npmjs.com/"),
    ("pypi", "https://pypi.org/"),
    ("crates.io", "https://crates.io/"),
    ("vercel", "https://vercel.com/"),
    ("netlify", "https://www.netlify.com/"),
    ("cloudflare", "https://www.cloudflare.com/"),
    ("aws", "https://aws.amazon.com/"),
    ("amazon", "https://www.amazon.com/"),
    ("notion", "https://www.notion.so/"),
    ("figma", "https://www.figma.com/"),
    ("slack", "https://slack.com/"),
    ("discord", "https://discord.com/"),
    ("spotify", "https://www.spotify.com/"),
    ("netflix", "https://www.netflix.com/"),
    ("openai", "https://openai.com/"),
    ("anthropic", "https://www.anthropic.com/"),
];

/// Look up an exact (already lowercased, normalised) alias.
pub fn lookup(alias: &str) -> Option<&'static str> {
    WELL_KNOWN_SITES
        .iter()
        .find(|(key, _)| *key == alias)
        .map(|(_, url)| *url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::screen_url;

    #[test]
    fn aliases_share_destination() {
        assert_eq!(lookup("hn"), lookup("hacker news"));
        assert_eq!(lookup("stack overflow"), lookup("stackoverflow"));
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(lookup("github"), Some("https://github.com/"));
        assert_eq!(lookup("github repo"), None);
        assert_eq!(lookup("GitHub"), None);
    }

    #[test]
    fn every_destination_is_already_screened() {
        for (alias, url) in WELL_KNOWN_SITES {
            assert_eq!(
                screen_url(url).as_deref(),
                Some(*url),
                "{alias} maps to a non-canonical URL"
            );
        }
    }

    #[test]
    fn aliases_are_normalised() {
        for (alias, _) in WELL_KNOWN_SITES {
            assert_eq!(*alias, alias.to_lowercase());
            assert_eq!(alias.split_whitespace().collect::<Vec<_>>().join(" "), *alias);
        }
    }
}
