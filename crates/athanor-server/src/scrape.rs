//! Catalog scraper for the upstream elements wiki.
//!
//! Fetches the elements page and walks its tier sections: every `h3`
//! headline is followed (possibly after intervening nodes) by a
//! `table.list-table` whose rows carry the element name, its SVG link, and
//! the recipe list. Fetching and parsing are split so the parser can be
//! tested against fixture HTML.

use anyhow::{anyhow, Context, Result};
use athanor_core::{Catalog, Element, Tier};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{ElementRef, Html, Selector};

const CATALOG_URL: &str = "https://little-alchemy.fandom.com/wiki/Elements_(Little_Alchemy_2)";
const FETCH_USER_AGENT: &str = "athanor-server/0.1 (catalog rebuild)";

/// Fetch the wiki page and parse it into a catalog.
pub fn scrape_catalog() -> Result<Catalog> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(FETCH_USER_AGENT));
    let client = Client::builder().default_headers(headers).build()?;

    let body = client
        .get(CATALOG_URL)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .with_context(|| format!("fetching {CATALOG_URL}"))?
        .text()?;

    parse_catalog(&body)
}

/// Parse the elements page HTML into a catalog.
pub fn parse_catalog(html: &str) -> Result<Catalog> {
    let document = Html::parse_document(html);
    let h3 = sel("h3")?;
    let headline = sel("span.mw-headline")?;
    let row = sel("tr")?;
    let cell = sel("td")?;
    let link = sel("a[title]")?;
    let file_link = sel("a.mw-file-description")?;
    let recipe_item = sel("ul li")?;

    let mut catalog = Catalog::default();

    for header in document.select(&h3) {
        let Some(raw_title) = header.select(&headline).next() else { continue };
        let title = raw_title.text().collect::<String>();
        if title.trim().is_empty() {
            continue;
        }
        let Some(table) = following_list_table(header) else { continue };

        let tier_name = clean_tier_name(title.trim());
        let mut elements = Vec::new();

        for (index, table_row) in table.select(&row).enumerate() {
            if index == 0 {
                continue; // header row
            }
            let cells: Vec<ElementRef<'_>> = table_row.select(&cell).collect();
            if cells.len() < 2 {
                continue;
            }
            let Some(name) = cells[0]
                .select(&link)
                .next()
                .map(|a| a.text().collect::<String>().trim().to_owned())
                .filter(|name| !name.is_empty())
            else {
                continue;
            };

            let svg_url = cells[0]
                .select(&file_link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default()
                .to_owned();
            let local_svg_path = if svg_url.is_empty() {
                String::new()
            } else {
                format!("{}/{}.svg", tier_name.replace(' ', "_"), name.replace(' ', "_"))
            };

            let mut recipes = Vec::new();
            for item in cells[1].select(&recipe_item) {
                let parts: Vec<String> = item
                    .select(&link)
                    .map(|a| a.text().collect::<String>().trim().to_owned())
                    .collect();
                if parts.len() == 2 {
                    recipes.push(parts);
                }
            }

            elements.push(Element {
                name,
                local_svg_path,
                original_svg_url: svg_url,
                recipes,
            });
        }

        if !elements.is_empty() {
            catalog.tiers.push(Tier { name: tier_name, elements });
        }
    }

    if catalog.tiers.is_empty() {
        return Err(anyhow!("no tier tables found in page"));
    }
    Ok(catalog)
}

/// The `table.list-table` following a section header, stopping at the next
/// header.
fn following_list_table(header: ElementRef<'_>) -> Option<ElementRef<'_>> {
    for sibling in header.next_siblings() {
        let Some(element) = ElementRef::wrap(sibling) else { continue };
        if element.value().name() == "h3" {
            return None;
        }
        if element.value().name() == "table"
            && element.value().classes().any(|class| class == "list-table")
        {
            return Some(element);
        }
    }
    None
}

/// Strip the `Tier ` prefix and ` element(s)` suffix from a headline.
fn clean_tier_name(raw: &str) -> String {
    let name = raw.strip_prefix("Tier ").unwrap_or(raw);
    let name = name.strip_suffix(" elements").unwrap_or(name);
    let name = name.strip_suffix(" element").unwrap_or(name);
    name.to_owned()
}

fn sel(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("invalid selector {css}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<html><body>
<h3><span class="mw-headline">Starting elements</span></h3>
<table class="list-table">
<tr><th>Element</th><th>Recipes</th></tr>
<tr>
  <td><a class="mw-file-description" href="https://img.example/Air.svg"></a>
      <a title="Air">Air</a></td>
  <td></td>
</tr>
</table>
<h3><span class="mw-headline">Tier 1 elements</span></h3>
<p>Intervening prose.</p>
<table class="list-table">
<tr><th>Element</th><th>Recipes</th></tr>
<tr>
  <td><a title="Mud">Mud</a></td>
  <td><ul>
    <li><a title="Water">Water</a> + <a title="Earth">Earth</a></li>
  </ul></td>
</tr>
<tr>
  <td><a title="Lava">Lava</a></td>
  <td><ul>
    <li><a title="Fire">Fire</a> + <a title="Earth">Earth</a></li>
    <li><a title="Broken">Broken</a></li>
  </ul></td>
</tr>
</table>
<h3><span class="mw-headline">Empty section</span></h3>
</body></html>"#;

    #[test]
    fn parses_tiers_and_elements() {
        let catalog = parse_catalog(FIXTURE).expect("parse");
        assert_eq!(catalog.tiers.len(), 2);
        assert_eq!(catalog.tiers[0].name, "Starting");
        assert_eq!(catalog.tiers[1].name, "1");

        let mud = &catalog.tiers[1].elements[0];
        assert_eq!(mud.name, "Mud");
        assert_eq!(mud.recipes, vec![vec!["Water".to_owned(), "Earth".to_owned()]]);
    }

    #[test]
    fn single_ingredient_entries_are_skipped() {
        let catalog = parse_catalog(FIXTURE).expect("parse");
        let lava = &catalog.tiers[1].elements[1];
        assert_eq!(lava.recipes.len(), 1, "the one-link list item must be dropped");
    }

    #[test]
    fn svg_links_fill_both_paths() {
        let catalog = parse_catalog(FIXTURE).expect("parse");
        let air = &catalog.tiers[0].elements[0];
        assert_eq!(air.original_svg_url, "https://img.example/Air.svg");
        assert_eq!(air.local_svg_path, "Starting/Air.svg");

        let mud = &catalog.tiers[1].elements[0];
        assert!(mud.original_svg_url.is_empty());
        assert!(mud.local_svg_path.is_empty());
    }

    #[test]
    fn tier_names_are_cleaned() {
        assert_eq!(clean_tier_name("Tier 7 elements"), "7");
        assert_eq!(clean_tier_name("Starting elements"), "Starting");
        assert_eq!(clean_tier_name("Final element"), "Final");
    }

    #[test]
    fn pages_without_tables_error() {
        assert!(parse_catalog("<html><body><p>nothing</p></body></html>").is_err());
    }
}
