use crate::normalize::{NormalizedTitle, Normalizer};
use crate::score::score;
use directories::BaseDirs;
use reel_scan::MovieRecord;
use std::cmp::Ordering;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Thresholds used when ranking candidates, all on the `0..=100` score scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Candidates scoring below this are dropped.
    pub min_score: f64,
    /// The top candidate must score above this to be picked automatically...
    pub auto_select_score: f64,
    /// ...and lead the runner-up by at least this much.
    pub margin: f64,
}
impl Default for MatchOptions {
    fn default() -> Self {
        Self { min_score: 60.0, auto_select_score: 90.0, margin: 5.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The query was a path to a readable file, which was used as-is.
    Direct,
    /// The top candidate is a confident, clear winner.
    AutoSelected,
    /// Several candidates are plausible; somebody has to choose.
    Ambiguous,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub record: MovieRecord,
    /// The normalized name the score was computed against.
    pub title: NormalizedTitle,
    pub score: f64,
    /// Position in the ranking, starting at 1.
    pub rank: usize,
}

/// The result of matching a query: ranked candidates and what to do with them.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    verdict: Verdict,
    candidates: Vec<MatchCandidate>,
}
impl Ranking {
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Best first.
    pub fn candidates(&self) -> &[MatchCandidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<MatchCandidate> {
        self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The candidate to use without asking, if the verdict allows one.
    pub fn selected(&self) -> Option<&MatchCandidate> {
        match self.verdict {
            Verdict::Direct | Verdict::AutoSelected => self.candidates.first(),
            Verdict::Ambiguous | Verdict::NoMatch => None,
        }
    }

    /// Resolve an ambiguous ranking with an externally chosen, zero-based index.
    pub fn choose(&self, index: usize) -> Option<&MatchCandidate> {
        self.candidates.get(index)
    }
}

/// Ranks library records against a free-text query.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    normalizer: Normalizer,
    options: MatchOptions,
}
impl MatchEngine {
    pub fn new(normalizer: Normalizer, options: MatchOptions) -> Self {
        Self { normalizer, options }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Find the records matching `query`.
    ///
    /// If `query` is itself the path of a readable file, that file is the
    /// only candidate and nothing is ranked. Otherwise see [`rank`](Self::rank).
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn find(&self, query: &str, records: &[MovieRecord]) -> Ranking {
        if let Some(ranking) = self.find_direct(query) {
            return ranking;
        }
        let ranking = self.rank(query, records);
        tracing::debug!(verdict = ?ranking.verdict, candidates = ranking.len(), "Ranked library");
        ranking
    }

    /// The [`Verdict::Direct`] ranking for `query`, if it is the path of a
    /// readable file. Lets callers skip loading the library entirely.
    pub fn find_direct(&self, query: &str) -> Option<Ranking> {
        let record = direct(query)?;
        tracing::debug!(path = %record.path.display(), "Query is a readable file; skipping search");
        let title = self.normalizer.normalize(&record.stem());
        Some(Ranking {
            verdict: Verdict::Direct,
            candidates: vec![MatchCandidate { record, title, score: 100.0, rank: 1 }],
        })
    }

    /// Score every record against `query` and rank those above the minimum.
    ///
    /// Each record is scored on its file name and, when it sits in a folder
    /// of its own (the folder is named differently from the one above it), on
    /// that folder's name too; the better of the two counts. Ties are broken
    /// by shorter title, then alphabetically, then by path.
    pub fn rank(&self, query: &str, records: &[MovieRecord]) -> Ranking {
        let query = self.normalizer.normalize(query);
        let mut candidates: Vec<MatchCandidate> = records
            .iter()
            .filter_map(|record| {
                let (title, score) = self.best_title(&query, record);
                (score >= self.options.min_score).then(|| MatchCandidate {
                    record: record.clone(),
                    title,
                    score,
                    rank: 0,
                })
            })
            .collect();
        candidates.sort_by(compare);
        for (position, candidate) in candidates.iter_mut().enumerate() {
            candidate.rank = position + 1;
        }
        let verdict = self.verdict(&candidates);
        Ranking { verdict, candidates }
    }

    fn best_title(&self, query: &NormalizedTitle, record: &MovieRecord) -> (NormalizedTitle, f64) {
        let title = self.normalizer.normalize(&record.stem());
        let stem_score = score(query.as_str(), title.as_str());
        let parent = record.parent_name().filter(|parent| Some(parent) != record.grandparent_name().as_ref());
        if let Some(parent) = parent {
            let folder = self.normalizer.normalize(&parent);
            let folder_score = score(query.as_str(), folder.as_str());
            if folder_score > stem_score {
                return (folder, folder_score);
            }
        }
        (title, stem_score)
    }

    fn verdict(&self, candidates: &[MatchCandidate]) -> Verdict {
        let Some(top) = candidates.first() else {
            return Verdict::NoMatch;
        };
        let clear_lead = candidates
            .get(1)
            .is_none_or(|runner_up| top.score - runner_up.score >= self.options.margin);
        if top.score > self.options.auto_select_score && clear_lead {
            Verdict::AutoSelected
        } else {
            Verdict::Ambiguous
        }
    }
}

fn compare(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.title.len().cmp(&b.title.len()))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.record.path.cmp(&b.record.path))
}

fn direct(query: &str) -> Option<MovieRecord> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let path = expand_home(Path::new(query), BaseDirs::new().as_ref().map(BaseDirs::home_dir));
    File::open(&path).ok()?;
    MovieRecord::from_path(&path).ok()
}

/// A leading `~` means the home directory, as it would in a shell.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::UtcDateTime;

    fn record(path: &str) -> MovieRecord {
        MovieRecord::new(path, 1, UtcDateTime::UNIX_EPOCH)
    }

    fn library() -> Vec<MovieRecord> {
        vec![
            record("/movies/Iron.Man.2008.MULTi.VF.1080p.BluRay.x264-BDHD.mkv"),
            record("/movies/Iron.Man.2.2010.1080p.BluRay.x264-SECTOR7.mkv"),
            record("/movies/Heat.1995.720p.BluRay.mkv"),
            record("/movies/Blade Runner (1982)/Blade Runner (1982).mp4"),
            record("/movies/Alien (1979)/movie.mkv"),
        ]
    }

    fn paths(ranking: &Ranking) -> Vec<&str> {
        ranking.candidates().iter().map(|c| c.record.path.to_str().unwrap()).collect()
    }

    #[test]
    fn tighter_title_ranks_first() {
        let ranking = MatchEngine::default().find("iron man", &library());
        assert_eq!(ranking.len(), 2);
        let [first, second] = ranking.candidates() else { unreachable!() };
        assert!(first.record.path.to_str().unwrap().contains("BDHD"));
        assert!(first.score > second.score);
        assert!(second.score >= 60.0);
        assert_eq!((first.rank, second.rank), (1, 2));
        // Both are near-perfect, so a person should pick.
        assert_eq!(ranking.verdict(), Verdict::Ambiguous);
        assert!(ranking.selected().is_none());
        assert_eq!(ranking.choose(1), Some(second));
        assert_eq!(ranking.choose(2), None);
    }

    #[test]
    fn clear_winner_is_auto_selected() {
        let ranking = MatchEngine::default().find("heat", &library());
        assert_eq!(ranking.verdict(), Verdict::AutoSelected);
        assert_eq!(paths(&ranking), ["/movies/Heat.1995.720p.BluRay.mkv"]);
        assert_eq!(ranking.selected().map(|c| c.score), Some(100.0));
    }

    #[test]
    fn matches_on_folder_name() {
        let ranking = MatchEngine::default().find("alien", &library());
        assert_eq!(ranking.verdict(), Verdict::AutoSelected);
        let top = ranking.selected().unwrap();
        assert_eq!(top.record.path.to_str(), Some("/movies/Alien (1979)/movie.mkv"));
        assert_eq!(top.title.as_str(), "alien");
    }

    #[test]
    fn ignores_folder_named_like_its_parent() {
        let records = vec![record("/movies/movies/Heat.mkv")];
        let ranking = MatchEngine::default().find("movies", &records);
        assert_eq!(ranking.verdict(), Verdict::NoMatch);
    }

    #[rstest]
    #[case::empty_library("iron man", vec![])]
    #[case::nothing_close("the godfather", library())]
    fn no_match(#[case] query: &str, #[case] records: Vec<MovieRecord>) {
        let ranking = MatchEngine::default().find(query, &records);
        assert_eq!(ranking.verdict(), Verdict::NoMatch);
        assert!(ranking.is_empty());
        assert!(ranking.selected().is_none());
    }

    #[test]
    fn equal_scores_prefer_shorter_then_lexical_title() {
        let records = vec![
            record("/b/Heat.Wave.mkv"),
            record("/a/Heat.Wave.mkv"),
            record("/c/Heat.Waves.mkv"),
            record("/d/Heat.Vave.mkv"),
        ];
        let options = MatchOptions { min_score: 0.0, ..MatchOptions::default() };
        let ranking = MatchEngine::new(Normalizer::default(), options).rank("heat", &records);
        assert_eq!(paths(&ranking), ["/d/Heat.Vave.mkv", "/a/Heat.Wave.mkv", "/b/Heat.Wave.mkv", "/c/Heat.Waves.mkv"]);
        assert_eq!(ranking.verdict(), Verdict::Ambiguous);
    }

    #[test]
    fn readable_path_bypasses_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Some.Home.Video.mkv");
        std::fs::write(&path, b"video").unwrap();
        let query = format!("  {}  ", path.display());
        let ranking = MatchEngine::default().find(&query, &library());
        assert_eq!(ranking.verdict(), Verdict::Direct);
        let selected = ranking.selected().unwrap();
        assert_eq!(selected.record.path, path);
        assert_eq!(selected.record.size, 5);
        assert_eq!(selected.score, 100.0);
        assert_eq!(selected.title.as_str(), "some home video");
    }

    #[rstest]
    #[case("~/Movies/Heat.mkv", "/home/me/Movies/Heat.mkv")]
    #[case("~", "/home/me")]
    #[case("~me/Heat.mkv", "~me/Heat.mkv")]
    #[case("/movies/~/Heat.mkv", "/movies/~/Heat.mkv")]
    fn tilde_expands_to_home(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(expand_home(Path::new(query), Some(Path::new("/home/me"))), Path::new(expected));
        assert_eq!(expand_home(Path::new(query), None), Path::new(query));
    }

    #[test]
    fn home_relative_path_is_a_direct_match() {
        let Some(home) = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()) else { return };
        let Ok(dir) = tempfile::tempdir_in(&home) else { return };
        let path = dir.path().join("Home.Movie.mkv");
        std::fs::write(&path, b"video").unwrap();
        let query = Path::new("~").join(path.strip_prefix(&home).unwrap());
        let ranking = MatchEngine::default().find(query.to_str().unwrap(), &library());
        assert_eq!(ranking.verdict(), Verdict::Direct);
        assert_eq!(ranking.selected().unwrap().record.path, path);
    }

    #[test]
    fn title_year_tells_remake_from_original() {
        let records = vec![
            record("/movies/Blade.Runner.1982.1080p.BluRay.mkv"),
            record("/movies/Blade.Runner.2049.2017.1080p.BluRay.mkv"),
        ];
        let ranking = MatchEngine::default().find("blade runner 2049", &records);
        let [first, second] = ranking.candidates() else { unreachable!() };
        assert_eq!(first.record.path, Path::new("/movies/Blade.Runner.2049.2017.1080p.BluRay.mkv"));
        assert_eq!(first.title.as_str(), "blade runner 2049");
        assert_eq!(first.score, 100.0);
        assert!(first.score > second.score);
        // With `--yes` the first candidate is the one that gets cut.
        assert_eq!(ranking.choose(0), Some(first));
    }

    #[test]
    fn leading_year_is_part_of_the_title() {
        let records = vec![record("/movies/2001.A.Space.Odyssey.1968.720p.mkv"), record("/movies/Heat.1995.mkv")];
        let ranking = MatchEngine::default().find("2001", &records);
        assert_ne!(ranking.verdict(), Verdict::NoMatch);
        assert_eq!(paths(&ranking), ["/movies/2001.A.Space.Odyssey.1968.720p.mkv"]);
        assert_eq!(ranking.candidates()[0].title.as_str(), "2001 a space odyssey");
    }

    #[test]
    fn directory_path_is_not_a_direct_match() {
        let dir = tempfile::tempdir().unwrap();
        let ranking = MatchEngine::default().find(dir.path().to_str().unwrap(), &library());
        assert_ne!(ranking.verdict(), Verdict::Direct);
    }
}
