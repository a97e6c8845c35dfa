// Analysis pipeline: fans a URL out to every registered analyzer
// concurrently and funnels the batch through the scoring engine.

use futures::future::join_all;
use tracing::debug;

use crate::analyzers::Analyzer;
use crate::scoring::engine::ScoringEngine;
use crate::scoring::verdict::AggregateResult;

pub struct AnalysisPipeline {
    analyzers: Vec<Box<dyn Analyzer>>,
    engine: ScoringEngine,
}

impl AnalysisPipeline {
    pub fn new(engine: ScoringEngine) -> Self {
        AnalysisPipeline {
            analyzers: Vec::new(),
            engine,
        }
    }

    /// Registration order is result order in the verdict. The URL analyzer
    /// registers first, so the verdict's `url` field reflects its metadata.
    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    pub fn analyzer_count(&self) -> usize {
        self.analyzers.len()
    }

    /// Run every analyzer on the URL and aggregate. Analyzer failures
    /// surface as degraded results inside the verdict, never as an Err,
    /// so one flaky data source cannot sink the whole analysis.
    pub async fn analyze(&self, url: &str) -> AggregateResult {
        debug!(url, analyzers = self.analyzers.len(), "starting analysis");
        let runs = self.analyzers.iter().map(|analyzer| {
            debug!(plugin = analyzer.plugin_id(), "dispatching");
            analyzer.analyze(url)
        });
        let results = join_all(runs).await;
        self.engine.calculate_total_score(&results)
    }
}
