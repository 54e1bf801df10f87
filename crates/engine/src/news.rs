use core_types::{Article, Sentiment};

/// Number of items the news panel shows.
pub const ARTICLE_COUNT: usize = 5;

const MOCK_DATE: &str = "2025-01-01 12:00:00";
const MOCK_IMAGE: &str = "https://portal.financialmodelingprep.com/positions/default.png";
const MOCK_SITE: &str = "mocksource.com";

const POSITIVE_KEYWORDS: [&str; 9] = [
    "gain", "rise", "grow", "profit", "success", "optimistic", "boost", "exceed", "strong",
];
const NEGATIVE_KEYWORDS: [&str; 8] = [
    "fall", "drop", "lose", "decline", "miss", "uncertainty", "impact", "risk",
];

/// Keyword tone of `text`: whichever list has more keywords present wins,
/// a tie is neutral. Matching is case-insensitive and by substring.
pub fn classify_sentiment(text: &str) -> Sentiment {
    let text = text.to_lowercase();
    let hits = |keywords: &[&str]| keywords.iter().filter(|kw| text.contains(*kw)).count();
    let (positive, negative) = (hits(&POSITIVE_KEYWORDS), hits(&NEGATIVE_KEYWORDS));

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Tags a fetched article with the tone of its title and body.
pub fn with_sentiment(mut article: Article) -> Article {
    let text = format!("{} {}", article.title, article.content);
    article.sentiment = Some(classify_sentiment(&text));
    article
}

/// Placeholder articles served when the provider cannot be used.
///
/// With a ticker they read as stock news for it, otherwise as general market
/// articles.
pub fn mock_articles(ticker: Option<&str>) -> Vec<Article> {
    (1..=ARTICLE_COUNT)
        .map(|n| match ticker {
            Some(ticker) => {
                let ticker = ticker.to_uppercase();
                Article {
                    title: format!("Mock News #{} for {}", n, ticker),
                    date: MOCK_DATE.to_string(),
                    content: format!(
                        "<p>This is a mock-news snippet for {}. Replace with real snippet when FMP API works.</p>",
                        ticker
                    ),
                    image: MOCK_IMAGE.to_string(),
                    link: "#".to_string(),
                    author: "Mock Author".to_string(),
                    site: MOCK_SITE.to_string(),
                    sentiment: None,
                }
            }
            None => Article {
                title: format!("Mock Market Article #{}", n),
                date: MOCK_DATE.to_string(),
                content: "<p>This is a mock-market article snippet. Replace with real snippet when FMP API works.</p>"
                    .to_string(),
                image: MOCK_IMAGE.to_string(),
                link: "#".to_string(),
                author: "FMP Mock".to_string(),
                site: MOCK_SITE.to_string(),
                sentiment: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sentiment() {
        assert_eq!(classify_sentiment("Profits EXCEED forecasts"), Sentiment::Positive);
        assert_eq!(classify_sentiment("Shares drop on demand decline"), Sentiment::Negative);
        assert_eq!(classify_sentiment("Strong quarter, but risk remains"), Sentiment::Neutral);
        assert_eq!(classify_sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn test_mocks_carry_no_sentiment() {
        assert!(mock_articles(Some("IBM")).iter().all(|a| a.sentiment.is_none()));
    }

    #[test]
    fn test_mock_stock_news() {
        let articles = mock_articles(Some("aapl"));
        assert_eq!(articles.len(), ARTICLE_COUNT);
        assert_eq!(articles[0].title, "Mock News #1 for AAPL");
        assert_eq!(articles[4].title, "Mock News #5 for AAPL");
        assert_eq!(articles[0].author, "Mock Author");
        assert!(articles.iter().all(|a| a.link == "#" && a.site == "mocksource.com"));
    }

    #[test]
    fn test_mock_market_articles() {
        let articles = mock_articles(None);
        assert_eq!(articles.len(), ARTICLE_COUNT);
        assert_eq!(articles[2].title, "Mock Market Article #3");
        assert_eq!(articles[2].author, "FMP Mock");
        assert_eq!(articles[2].date, "2025-01-01 12:00:00");
    }
}
