use serde_json::json;

use forkify::data_models::{Recipe, RecipePreview};
use forkify::dom::Tree;
use forkify::error::{EmptyResultError, ViewError};
use forkify::views::markup::{PreviewList, PreviewListMarkup, RecipeMarkup};
use forkify::views::{MessageKind, View, ViewStatus};

fn recipe(servings: u32) -> Recipe {
    serde_json::from_value(json!({
        "id": "664c8f193e7aa067e94e8297",
        "title": "Spicy Chicken & Rice",
        "publisher": "Closet Cooking",
        "sourceUrl": "https://source.test/spicy",
        "image": "https://img.test/spicy.jpg",
        "servings": servings,
        "cookingTime": 45,
        "ingredients": [
            { "quantity": 200, "unit": "g", "description": "flour" },
            { "quantity": 1.5, "unit": "tsp", "description": "salt" },
            { "quantity": null, "unit": "", "description": "Olive oil" }
        ]
    }))
    .unwrap()
}

fn previews(n: usize) -> PreviewList {
    PreviewList {
        items: (0..n)
            .map(|i| RecipePreview {
                id: format!("id{i}"),
                title: format!("Pasta {i}"),
                publisher: "Pub".into(),
                image: format!("https://img.test/{i}.jpg"),
                key: None,
            })
            .collect(),
        active_id: None,
    }
}

fn by_class(tree: &Tree, class: &str) -> Vec<usize> {
    tree.descendant_elements(tree.root())
        .into_iter()
        .filter(|&id| tree.node(id).has_class(class))
        .collect()
}

#[cfg(test)]
mod state_machine {
    use super::*;

    #[test]
    fn test_new_view_is_empty() {
        let view = View::new("div", RecipeMarkup);
        assert_eq!(view.status(), ViewStatus::Empty);
        assert_eq!(view.container().inner_html(), "");
        assert_eq!(view.container().node(view.container().root()).tag_name(), Some("div"));
    }

    #[test]
    fn test_update_before_render_is_rejected() {
        let mut view = View::new("div", RecipeMarkup);
        assert_eq!(view.update(&recipe(4)), Err(ViewError::NotShowingContent));
        assert_eq!(view.status(), ViewStatus::Empty);
    }

    #[test]
    fn test_update_while_spinner_is_rejected() {
        let mut view = View::new("div", RecipeMarkup);
        view.render_spinner();
        assert_eq!(view.status(), ViewStatus::Spinner);
        assert!(by_class(view.container(), "spinner").len() == 1);
        assert_eq!(view.update(&recipe(4)), Err(ViewError::NotShowingContent));
    }

    #[test]
    fn test_update_after_message_is_rejected() {
        let mut view = View::new("div", RecipeMarkup);
        view.render_message(MessageKind::Error, None);
        assert_eq!(view.status(), ViewStatus::Message(MessageKind::Error));
        assert!(view.update(&recipe(4)).is_err());
    }

    #[test]
    fn test_render_then_update_is_allowed() {
        let mut view = View::new("div", RecipeMarkup);
        view.render(&recipe(4));
        assert_eq!(view.status(), ViewStatus::Content);

        let report = view.update(&recipe(4)).unwrap();
        assert_eq!(report.mutations(), 0);
        assert_eq!(view.status(), ViewStatus::Content);
    }

    #[test]
    fn test_spinner_replaces_content() {
        let mut view = View::new("ul", PreviewListMarkup::results());
        view.render(&previews(3));
        view.render_spinner();
        assert!(by_class(view.container(), "preview").is_empty());
        assert_eq!(view.status(), ViewStatus::Spinner);
    }
}

#[cfg(test)]
mod messages {
    use super::*;

    #[test]
    fn test_empty_data_renders_default_error() {
        let mut view = View::new("ul", PreviewListMarkup::results());
        view.render(&PreviewList::default());

        assert_eq!(view.status(), ViewStatus::Message(MessageKind::Error));
        assert_eq!(
            view.container().text_lines(),
            vec!["No recipes found for your search. Please try again!"]
        );
    }

    #[test]
    fn test_bookmarks_view_has_its_own_message() {
        let mut view = View::new("ul", PreviewListMarkup::bookmarks());
        view.render(&PreviewList::default());
        assert_eq!(
            view.container().text_lines(),
            vec!["No bookmarks yet. Find a nice recipe and bookmark it :)"]
        );
    }

    #[test]
    fn test_custom_message_is_escaped() {
        let mut view = View::new("div", RecipeMarkup);
        view.render_message(MessageKind::Error, Some("<b>bad</b> & worse"));

        assert_eq!(view.container().text_lines(), vec!["<b>bad</b> & worse"]);
        assert!(
            view.container()
                .descendant_elements(view.container().root())
                .iter()
                .all(|&id| view.container().node(id).tag_name() != Some("b"))
        );
    }

    #[test]
    fn test_success_message_uses_smile_icon() {
        let mut view = View::new("div", RecipeMarkup);
        view.render_message(MessageKind::Success, Some("Done"));
        assert_eq!(view.status(), ViewStatus::Message(MessageKind::Success));
        assert!(view.container().inner_html().contains("#icon-smile"));
    }

    #[test]
    fn test_markup_reports_empty_data() {
        let view = View::new("ul", PreviewListMarkup::results());
        assert_eq!(view.markup(&PreviewList::default()), Err(EmptyResultError));
        assert!(view.markup(&previews(1)).unwrap().contains("Pasta 0"));
        // markup() never touches the container
        assert_eq!(view.status(), ViewStatus::Empty);
    }
}

#[cfg(test)]
mod recipe_updates {
    use super::*;

    #[test]
    fn test_servings_update_touches_only_changed_nodes() {
        let mut view = View::new("div", RecipeMarkup);
        view.render(&recipe(4));

        let mut doubled = recipe(8);
        doubled.ingredients[0].quantity = Some(400.0);
        doubled.ingredients[1].quantity = Some(3.0);

        let report = view.update(&doubled).unwrap();

        // servings count plus two quantities
        assert_eq!(report.text_updates, 3);
        // the two data-update-to buttons
        assert_eq!(report.attribute_updates, 2);

        let tree = view.container();
        let quantities: Vec<String> = by_class(tree, "recipe__quantity")
            .into_iter()
            .map(|id| tree.text_content(id))
            .collect();
        assert_eq!(quantities, vec!["400", "3", ""]);

        let people = by_class(tree, "recipe__info-data--people")[0];
        assert_eq!(tree.text_content(people), "8");

        let targets: Vec<&str> = by_class(tree, "btn--update-servings")
            .into_iter()
            .filter_map(|id| tree.node(id).attribute("data-update-to"))
            .collect();
        assert_eq!(targets, vec!["7", "9"]);
    }

    #[test]
    fn test_dropped_quantity_is_cleared_on_update() {
        let mut view = View::new("div", RecipeMarkup);
        view.render(&recipe(4));

        let mut edited = recipe(4);
        edited.ingredients[0].quantity = None;
        view.update(&edited).unwrap();

        let mut fresh = View::new("div", RecipeMarkup);
        fresh.render(&edited);
        assert!(view.container().content_equals(fresh.container()));
    }

    #[test]
    fn test_update_keeps_transient_state_render_drops_it() {
        let mut view = View::new("div", RecipeMarkup);
        view.render(&recipe(4));

        let list = by_class(view.container(), "recipe__ingredient-list")[0];
        let root = view.container().root();
        view.container_mut().set_transient(list, "scroll-top", "80");
        view.container_mut().set_transient(root, "focus", "servings");

        view.update(&recipe(5)).unwrap();
        assert_eq!(view.container().node(list).transient("scroll-top"), Some("80"));

        view.render(&recipe(5));
        let list = by_class(view.container(), "recipe__ingredient-list")[0];
        assert_eq!(view.container().node(list).transient("scroll-top"), None);
        // the container element itself survives a full render
        assert_eq!(view.container().node(root).transient("focus"), Some("servings"));
    }

    #[test]
    fn test_bookmark_icon_switches_on_update() {
        let mut view = View::new("div", RecipeMarkup);
        view.render(&recipe(4));

        let mut bookmarked = recipe(4);
        bookmarked.bookmarked = true;
        let report = view.update(&bookmarked).unwrap();

        assert_eq!(report.attribute_updates, 1);
        assert!(view.container().inner_html().contains("#icon-bookmark-fill"));
    }

    #[test]
    fn test_update_converges_on_fresh_render() {
        let mut patched = View::new("div", RecipeMarkup);
        patched.render(&recipe(4));
        let mut scaled = recipe(6);
        scaled.ingredients[0].quantity = Some(300.0);
        scaled.ingredients[1].quantity = Some(2.25);
        patched.update(&scaled).unwrap();

        let mut fresh = View::new("div", RecipeMarkup);
        fresh.render(&scaled);

        assert!(patched.container().content_equals(fresh.container()));
    }
}

#[cfg(test)]
mod preview_lists {
    use super::*;

    #[test]
    fn test_moving_the_active_item() {
        let mut view = View::new("ul", PreviewListMarkup::results());
        let mut list = previews(3);
        list.active_id = Some("id0".into());
        view.render(&list);

        list.active_id = Some("id2".into());
        let report = view.update(&list).unwrap();

        assert_eq!(report.text_updates, 0);
        assert_eq!(report.attribute_updates, 2);
        let active = by_class(view.container(), "preview__link--active");
        assert_eq!(active.len(), 1);
        assert_eq!(view.container().node(active[0]).attribute("href"), Some("#id2"));
    }

    #[test]
    fn test_update_with_a_shorter_list_leaves_stale_items() {
        let mut view = View::new("ul", PreviewListMarkup::bookmarks());
        view.render(&previews(2));

        let report = view.update(&previews(1)).unwrap();

        assert!(report.unvisited > 0);
        assert_eq!(by_class(view.container(), "preview").len(), 2);
    }
}
