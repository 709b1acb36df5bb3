// * Configuration Constants
// * Central location for all default thresholds, timeouts and source lists

// * Number of source records rendered into a single extraction prompt
pub const CHUNK_SIZE: usize = 5;

// * Maximum characters of a source record's content included in a prompt
pub const MAX_CONTENT_CHARS: usize = 1500;

// * Maximum characters of a source record's title included in a prompt
pub const MAX_TITLE_CHARS: usize = 100;

// * Wall-clock budget for one model invocation
pub const MODEL_TIMEOUT_SECS: u64 = 120;

// * Default local model served by Ollama
pub const DEFAULT_MODEL: &str = "mistral";

// * Default program used to reach the local model runtime
pub const DEFAULT_MODEL_PROGRAM: &str = "ollama";

// * Default number of clusters requested from the analysis stage
pub const DEFAULT_CLUSTERS: usize = 6;

// * TF-IDF vocabulary cap
pub const MAX_TFIDF_FEATURES: usize = 100;

// * Fixed k-means seed and number of initializations
pub const KMEANS_SEED: u64 = 42;
pub const KMEANS_RUNS: usize = 10;

// * Keywords used by the relevance pre-filter (case-insensitive substring match)
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "startup", "company", "ai", "software", "tech", "business", "venture", "funding", "raised",
];

// * Research defaults
pub const MAX_ENTRIES_PER_FEED: usize = 30;
pub const FEED_TIMEOUT_SECS: u64 = 10;
pub const MIN_SOURCE_CONTENT_CHARS: usize = 50;
pub const DEFAULT_FEED_CATEGORY: &str = "General Startups";

// * Enrichment defaults
pub const ENRICHMENT_TIMEOUT_SECS: u64 = 5;
pub const ENRICHMENT_DELAY_MS: u64 = 500;
pub const ENRICHMENT_SKIP_DESCRIPTION_CHARS: usize = 100;

// * Persistence defaults
pub const DEFAULT_DATA_DIR: &str = "data";
pub const OPENVC_LOCAL_FILE: &str = "openvc_startups_sample.json";
pub const OPENVC_GITHUB_URL: &str =
    "https://raw.githubusercontent.com/openvc/startup-dataset/main/startup_dataset.json";
pub const RSS_ARTICLES_FILE: &str = "rss_articles.json";
pub const STARTUPS_EXTRACTED_FILE: &str = "startups_extracted.json";

// * RSS feeds by topic category
pub const FEEDS_BY_TOPIC: &[(&str, &[&str])] = &[
    (
        "General Startups",
        &[
            "https://techcrunch.com/startups/feed/",
            "https://venturebeat.com/category/startups/feed/",
            "https://sifted.eu/feed/",
            "https://www.eu-startups.com/feed/",
            "https://news.crunchbase.com/feed/",
            "https://tech.eu/feed/",
            "https://yourstory.com/feed",
            "https://startupdaily.net/feed/",
            "https://www.seedtable.com/rss",
        ],
    ),
    (
        "AI & DeepTech",
        &[
            "https://venturebeat.com/category/ai/feed/",
            "https://aibusiness.com/rss",
            "https://syncedreview.com/feed/",
            "https://pub.towardsai.net/feed",
            "https://www.technologyreview.com/feed/",
            "https://www.techtarget.com/searchenterpriseai/feed",
        ],
    ),
    (
        "Fintech & SaaS",
        &[
            "https://www.finextra.com/rss/news.aspx",
            "https://www.altfi.com/feed",
            "https://saasmag.com/feed/",
            "https://www.pymnts.com/feed/",
        ],
    ),
    (
        "Climate & Sustainability",
        &[
            "https://www.ctvc.co/rss/",
            "https://cleantechnica.com/feed/",
            "https://www.greenbiz.com/rss.xml",
            "https://techcrunch.com/tag/climate/feed/",
        ],
    ),
    (
        "Health & Robotics",
        &[
            "https://www.medtechdive.com/feeds/news/",
            "https://www.robotics247.com/rss",
            "https://www.fiercebiotech.com/rss/xml",
            "https://spectrum.ieee.org/rss/fulltext",
        ],
    ),
    (
        "Regional / DACH / Europe",
        &[
            "https://siliconcanals.com/feed/",
            "https://technation.io/feed/",
            "https://www.startus-insights.com/feed/",
            "https://www.businessinsider.de/rss",
            "https://www.handelsblatt.com/contentexport/feed/tech-rss",
        ],
    ),
];
