use crate::data_models::{ApiRecipeUpload, Ingredient};
use crate::error::ValidationError;

pub const WRONG_INGREDIENT_FORMAT: &str =
    "Wrong ingredient format! Please use the correct format :)";

/// Raw fields of the "add recipe" form, exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub source_url: String,
    pub image: String,
    pub publisher: String,
    pub cooking_time: String,
    pub servings: String,
    /// One `quantity,unit,description` line per ingredient field, in form order.
    pub ingredients: Vec<String>,
}

impl NewRecipe {
    /// Build from submitted form entries. Any field whose name contains
    /// `ingredient` is an ingredient line; unknown fields are ignored.
    pub fn from_form<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut recipe = NewRecipe::default();
        for (name, value) in entries {
            let name = name.as_ref();
            let value = value.into();
            match name {
                "title" => recipe.title = value,
                "sourceUrl" => recipe.source_url = value,
                "image" => recipe.image = value,
                "publisher" => recipe.publisher = value,
                "cookingTime" => recipe.cooking_time = value,
                "servings" => recipe.servings = value,
                _ if name.contains("ingredient") => recipe.ingredients.push(value),
                _ => log::debug!("ignoring unknown form field {name}"),
            }
        }
        recipe
    }

    /// Validate the form and build the upload request body.
    pub fn to_payload(&self) -> Result<ApiRecipeUpload, ValidationError> {
        let ingredients = self
            .ingredients
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| parse_ingredient(line))
            .collect::<Result<Vec<_>, _>>()?;

        let cooking_time: f64 = self
            .cooking_time
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t: &f64| t.is_finite() && *t >= 0.0)
            .ok_or_else(|| {
                ValidationError::new(format!("Invalid cooking time: '{}'", self.cooking_time))
            })?;

        let servings: u32 = self
            .servings
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|s: &u32| *s > 0)
            .ok_or_else(|| {
                ValidationError::new(format!("Invalid number of servings: '{}'", self.servings))
            })?;

        Ok(ApiRecipeUpload {
            title: self.title.clone(),
            source_url: self.source_url.clone(),
            image_url: self.image.clone(),
            publisher: self.publisher.clone(),
            cooking_time,
            servings,
            ingredients,
        })
    }
}

/// Parse a `quantity,unit,description` line.
///
/// The quantity may be left empty (no quantity), as may the unit. The line
/// must have exactly three parts and a description.
pub fn parse_ingredient(line: &str) -> Result<Ingredient, ValidationError> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [quantity, unit, description] = parts.as_slice() else {
        return Err(ValidationError::new(WRONG_INGREDIENT_FORMAT));
    };
    if description.is_empty() {
        return Err(ValidationError::new(WRONG_INGREDIENT_FORMAT));
    }

    let quantity = if quantity.is_empty() {
        None
    } else {
        let q: f64 = quantity
            .parse::<f64>()
            .ok()
            .filter(|q: &f64| q.is_finite())
            .ok_or_else(|| {
                ValidationError::new(format!("Invalid ingredient quantity: '{quantity}'"))
            })?;
        Some(q)
    };

    Ok(Ingredient {
        quantity,
        unit: unit.to_string(),
        description: description.to_string(),
    })
}
