pub(crate) const CATALOGUE_HTML: &str = r#"<html>
  <body>
    <table>
      <tbody>
        <tr>
          <td><a>First row not taken</a></td>
          <td>First row not taken</td>
        </tr>
        <tr>
          <td><a href="/yes/series/test">Yes Series Test</a></td>
          <td>Single volume</td>
        </tr>
        <tr>
          <td><a href="/no-series/no_series_test">No Series Test</a></td>
          <td>Single volume</td>
        </tr>
      </tbody>
    </table>
  </body>
</html>"#;

/// Four blocks: the second lacks an excerpt, the third a publication and
/// the fourth a title. Pager points at page 1.
pub(crate) const RESULTS_PAGE_0: &str = r#"<html>
  <body>
    <div class="region region-content">
      <div class="view-content">
        <div class="views-row">
          <h4 class="title"><a href="/doc/1">Title 1</a></h4>
          <p class="publication">Publication 1</p>
          <p class="excerpt">Excerpt 1</p>
        </div>
        <div class="views-row">
          <h4 class="title"><a href="/doc/2">Title 2</a></h4>
          <p class="publication">Publication 2</p>
        </div>
        <div class="views-row">
          <h4 class="title"><a href="/doc/3">Title 3</a></h4>
          <p class="excerpt">Excerpt 3</p>
        </div>
        <div class="views-row">
          <p class="publication">Publication 4</p>
          <p class="excerpt">Excerpt 4</p>
        </div>
      </div>
      <div class="item-list">
        <ul class="pager">
          <li class="pager-next"><a title="Go to next page" href="/search/series/yes--series--test?query=test_query&amp;page=1">next</a></li>
          <li class="pager-last"><a title="Go to last page" href="/search/series/yes--series--test?query=test_query&amp;page=1">last</a></li>
        </ul>
      </div>
    </div>
  </body>
</html>"#;

pub(crate) const RESULTS_PAGE_1: &str = r#"<html>
  <body>
    <div class="region region-content">
      <div class="view-content">
        <div class="views-row">
          <h4 class="title"><a href="/doc/5">Title 5</a></h4>
          <p class="publication">Publication 5</p>
          <p class="excerpt">Excerpt 5</p>
        </div>
      </div>
    </div>
  </body>
</html>"#;

/// What the site renders when a search matches nothing.
pub(crate) const EMPTY_SEARCH_PAGE: &str = r#"<html>
  <body>
    <div class="region region-content">
      <p>Your search yielded no results.</p>
    </div>
  </body>
</html>"#;
