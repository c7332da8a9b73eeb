//! Turns the structured scene configuration into the text prompt sent to the
//! image model.
//!
//! Composition is pure: the same inputs always yield byte-identical output.

use crate::models::{ModelConfig, ProductConfig, SceneConfig};

pub const BASE_TECHNICAL_INSTRUCTION: &str =
    "High-end commercial photography, sharp focus, professional color grading, 8k resolution.";

pub const FOOD_BEVERAGE_CLAUSE: &str = " Macro photography style, appetizing textures, steam or condensation if applicable, vibrant food colors, bokeh background.";

pub const SMALL_OBJECT_CLAUSE: &str = " Sharp detail on product textures and labels, reflective surfaces handled professionally, clean composition.";

pub const ENHANCE_PREAMBLE: &str = "ENHANCE THIS IMAGE: Maintain the model's pose and composition from the source.";

/// Technical treatment applied on top of the base photography clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductTreatment {
    FoodOrBeverage,
    SmallObject,
    Standard,
}

/// Evaluated top to bottom; the first rule with a keyword contained in the
/// category wins.
const TREATMENT_RULES: &[(ProductTreatment, &[&str])] = &[
    (
        ProductTreatment::FoodOrBeverage,
        &["Burger", "Sushi", "Pizza", "Steak", "Ramen", "Salad", "Kue", "Donat", "Nasi", "Kopi", "Teh", "Minuman", "Jus", "Boba"],
    ),
    (
        ProductTreatment::SmallObject,
        &["Cincin", "Perhiasan", "Lipstik", "Skincare", "Parfum", "Earbuds", "Smartphone", "Lilin", "Mug"],
    ),
];

impl ProductTreatment {
    /// Case-sensitive substring match of the category against the rule table.
    pub fn classify(category: &str) -> Self {
        TREATMENT_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| category.contains(*kw)))
            .map(|(treatment, _)| *treatment)
            .unwrap_or(Self::Standard)
    }

    pub fn clause(&self) -> &'static str {
        match self {
            Self::FoodOrBeverage => FOOD_BEVERAGE_CLAUSE,
            Self::SmallObject => SMALL_OBJECT_CLAUSE,
            Self::Standard => "",
        }
    }
}

pub fn technical_instruction(category: &str) -> String {
    format!("{}{}", BASE_TECHNICAL_INSTRUCTION, ProductTreatment::classify(category).clause())
}

pub fn base_prompt(model: &ModelConfig, product: &ProductConfig, scene: &SceneConfig) -> String {
    format!(
        "Professional commercial advertisement photo.\n\
         Model: {} {} {}, hair style: {}, expression: {}.\n\
         Product: {} {} {}.\n\
         Product Details: {}.\n\
         Interaction: The model is {} the product.\n\
         Pose & Scene: {} in a {}.\n\
         Lighting & Style: {} lighting, {} style.\n\
         {}\n\
         Ensure anatomically correct hands and realistic skin textures. The product should be the main focal point.",
        model.age, model.ethnicity, model.gender, model.hair_style, model.expression,
        product.color, product.material, product.category,
        product.description,
        scene.interaction_type,
        scene.pose, scene.environment,
        scene.lighting, scene.style,
        technical_instruction(&product.category),
    )
}

/// Builds the final prompt. With a reference image the base prompt is wrapped
/// in an enhancement block that keeps the source composition.
pub fn compose(model: &ModelConfig, product: &ProductConfig, scene: &SceneConfig, has_reference_image: bool) -> String {
    let base = base_prompt(model, product, scene);
    if !has_reference_image {
        return base;
    }
    format!(
        "{}\n\
         Transform the scene into a professional advertisement.\n\
         Update the product to be a {} {} with {}.\n\
         The model should be {} it.\n\
         New Environment: {}.\n\
         {}",
        ENHANCE_PREAMBLE,
        product.color, product.category, product.description,
        scene.interaction_type,
        scene.environment,
        base,
    )
}
