//! Scripted fetcher and HTML fixtures shared by the unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use gamescrape_core::Error;

use crate::fetch::{FetchResponse, Fetcher, Headers};

enum Reply {
    Page { status: u16, body: String },
    Transport(String),
}

/// Serves scripted replies in order and records every request.
///
/// Once the script is exhausted every further fetch is a transport failure.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<(String, Headers)>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(self, body: impl Into<String>) -> Self {
        self.status(200, body)
    }

    pub(crate) fn status(self, status: u16, body: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Page { status, body: body.into() });
        self
    }

    pub(crate) fn transport_error(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Transport(message.to_string()));
        self
    }

    /// URLs requested so far, in order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    /// Headers sent with the `index`th request.
    pub(crate) fn headers(&self, index: usize) -> Headers {
        self.requests.lock().unwrap()[index].1.clone()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &url::Url, headers: &Headers) -> Result<FetchResponse, Error> {
        self.requests.lock().unwrap().push((url.to_string(), headers.clone()));

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Page { status, body }) => Ok(FetchResponse::new(url.clone(), status, body)),
            Some(Reply::Transport(message)) => Err(Error::Transport(message)),
            None => Err(Error::Transport(format!("no scripted reply for {url}"))),
        }
    }
}

pub(crate) const BASE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Monty Python's Complete Waste of Time for PC</title></head>
<body>
    <h1 class="page-title">Monty Python's Complete Waste of Time</h1>
    <div class="desc">A quirky trivia game.</div>
    <div class="pod pod_gameinfo">
        <ul>
            <li class="boxshot"><img src="/box/1.jpg"></li>
            <li class="core-platform">PC</li>
            <li><b>Platform:</b> <a href="/pc">PC</a>, <a href="/mac">Macintosh</a></li>
            <li><a href="/company/1200-7th-level">7th Level</a></li>
            <li><b>Release Date:</b> 1995</li>
            <li><b>Franchise:</b> <a href="/franchise/42-monty-python">Monty Python</a></li>
            <li class="esrb">T - Teen</li>
            <li><a href="/pc/1-complete-waste-of-time#dlc">2 Add-Ons</a></li>
            <li class="metacritic">
                <div class="score">77</div>
                <div class="review_link">Based on 12 Critic Reviews</div>
            </li>
            <li>Genre: Miscellaneous</li>
        </ul>
    </div>
    <fieldset class="mygames_section">
        <div class="subsection-title">Owned: <div class="rating">41</div></div>
    </fieldset>
    <fieldset class="mygames_section">
        <div class="subsection-title">Rating: 3.05 / 5 <p class="rate">1,204 Ratings</p></div>
    </fieldset>
    <fieldset class="mygames_section" disabled>
        <div class="subsection-title">Difficulty: Just Right</div>
    </fieldset>
</body>
</html>"#;

pub(crate) const DATA_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <h1 class="page-title">Monty Python's Complete Waste of Time</h1>
    <div class="pod pod_titledata">
        <dl>
            <dt>Developer:</dt><dd>7th Level</dd>
            <dt>Genre:</dt><dd>Miscellaneous &gt; Puzzle &gt; Trivia</dd>
            <dt>Local Players:</dt><dd>1 Player</dd>
            <dt>Also Known As:</dt><dd>Complete Waste, CWOT</dd>
            <dt>Wiki:</dt><dd> </dd>
        </dl>
    </div>
    <table class="contrib">
        <tr><td class="cregion">US</td><td class="datacompany">7th Level</td></tr>
        <tr>
            <td class="datapid">70001</td><td class="datapid">718122700018</td>
            <td class="cdate">11/30/95</td><td class="datarating">T</td>
        </tr>
        <tr><td class="cregion">EU</td><td class="datacompany">Panasonic</td></tr>
        <tr>
            <td class="datapid"></td><td class="datapid">5012345678900</td>
            <td class="cdate">1996</td><td class="datarating">ELSPA 11+</td>
        </tr>
    </table>
    <div id="dlc">
        <a href="/pc/100-spam-pack">Spam Pack</a>
        <a href="/pc/101-parrot-pack">Parrot Pack</a>
    </div>
</body>
</html>"#;

pub(crate) const ANSWERED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <table class="qna_table">
        <thead><tr><th class="question">Enemy/Boss Help</th><th>Answers</th></tr></thead>
        <tbody>
            <tr><td><a href="/pc/1-game/answers/11">How do I beat the Black Knight?</a></td><td class="count">3</td></tr>
            <tr><td><a href="/pc/1-game/answers/12">Where is the spam?</a></td><td class="count">0</td></tr>
        </tbody>
    </table>
    <table class="qna_table">
        <thead><tr><th class="question">Technical Help</th><th>Answers</th></tr></thead>
        <tbody>
            <tr><td><a href="/pc/1-game/answers/13">Does it run on Windows 95?</a></td><td class="count">-</td></tr>
        </tbody>
    </table>
</body>
</html>"#;

pub(crate) const UNRESOLVED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <table class="qna_table">
        <thead><tr><th class="question">Item Help</th><th>Answers</th></tr></thead>
        <tbody>
            <tr><td><a href="/pc/1-game/answers/21">What is the airspeed of a swallow?</a></td><td class="count">0</td></tr>
        </tbody>
    </table>
</body>
</html>"#;

pub(crate) const DETAIL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <div class="main_content">
        <div class="row">
            <div class="span8">
                <div class="friend_info"><span class="name">How do I beat the Black Knight without losing a limb?</span></div>
                <div class="friend_info">
                    <span class="name">Keep hitting him.</span><span class="up">5</span><span class="down">1</span>
                </div>
                <div class="friend_info">
                    <span class="name">Call it a draw.</span><span class="up">2</span><span class="down">0</span>
                </div>
            </div>
            <div class="span4">
                <div class="friend_info">
                    <span class="name">Sidebar entry</span><span class="up">9</span><span class="down">9</span>
                </div>
            </div>
        </div>
    </div>
</body>
</html>"#;

pub(crate) const NO_RESULTS_PAGE: &str =
    r#"<html><body><div class="error">No results found. Please try another search.</div></body></html>"#;

pub(crate) const RANKING_SEARCH_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <div class="pod">Search Results</div>
    <table>
        <tr><th>Platform</th><th>Game</th><th>Rating</th></tr>
        <tr>
            <td>PC</td>
            <td>
                <a href="/pc/914233-monty-python/index.html">Monty Python's Complete Waste of Time</a><br>
                7th Level, 1995
            </td>
            <td><span>72.50%</span><br>4 Reviews</td>
        </tr>
        <tr>
            <td>MAC</td>
            <td>
                <a href="/mac/914234-holy-grail/index.html">Monty Python and the Quest for the Holy Grail</a><br>
                7th Level, 1996
            </td>
            <td><span>n/a</span><br>0 Reviews</td>
        </tr>
    </table>
</body>
</html>"#;

pub(crate) const RANKING_NO_RESULTS_PAGE: &str =
    r#"<html><body><div class="pod">No results were found for your search.</div></body></html>"#;

pub(crate) const REVIEWS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <table class="release">
        <thead><tr><th>Site</th><th>Date</th><th>Score</th><th>Ratio</th></tr></thead>
        <tbody>
            <tr>
                <td>PC Gamer</td><td>Jan 1996</td>
                <td><a href="http://example.com/review/1">8/10</a></td><td>80%</td>
            </tr>
            <tr>
                <td>Computer Gaming World</td><td>Mar 1996</td>
                <td>3.5/5</td><td>70%</td>
            </tr>
        </tbody>
    </table>
</body>
</html>"#;

/// A game search result page listing `names` in order.
///
/// Each result is credited to two companies, sits in the `Puzzle` genre
/// and is available on PC and Mac.
pub(crate) fn search_page(names: &[&str]) -> String {
    let mut html = String::from("<html><body><div class=\"search_results\">");
    for (idx, name) in names.iter().enumerate() {
        let slug = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
        html.push_str(&format!(
            r#"<div class="search_result">
                <div class="sr_title">
                    <a class="sevent" href="/pc/{idx}-{slug}">{name}</a>
                    <div class="sr_info">7th Level, Panasonic, Puzzle, 1995</div>
                </div>
                <div class="sr_details">
                    <div class="sr_product_name"><a href="/pc/{idx}-{slug}">PC</a></div>
                    <div class="sr_product_name"><a href="/mac/{idx}-{slug}">MAC</a></div>
                </div>
            </div>"#
        ));
    }
    html.push_str("</div></body></html>");
    html
}

/// A platform listing page with one row per `(name, link)`.
pub(crate) fn listing_page(entries: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><body><table class=\"results\"><tbody>");
    for (name, link) in entries {
        html.push_str(&format!(r#"<tr><td class="rtitle"><a href="{link}">{name}</a></td><td>1995</td></tr>"#));
    }
    html.push_str("</tbody></table></body></html>");
    html
}
