//! Option lists offered to the user for each configuration field.

use serde::Serialize;

use crate::models::{AspectRatio, ImageSize, ModelConfig, ProductConfig, SceneConfig};

pub const GENDER_OPTIONS: &[&str] = &["Wanita", "Pria", "Anak-anak", "Non-biner"];
pub const AGE_OPTIONS: &[&str] = &["Balita", "Anak-anak", "Remaja", "Dewasa Muda", "Dewasa", "Paruh Baya", "Lansia"];
pub const ETHNICITY_OPTIONS: &[&str] = &["Asia Tenggara", "Asia Timur", "Kaukasia", "Afrika", "Hispanik", "Timur Tengah", "Asia Selatan", "Campuran"];
pub const HAIR_OPTIONS: &[&str] = &["Pendek", "Sedang", "Panjang", "Keriting", "Lurus", "Wavy", "Botak", "Kuncir Kuda", "Buzz Cut", "Hijab", "Turban"];
pub const EXPRESSION_OPTIONS: &[&str] = &["Senyum Ramah", "Percaya Diri", "Netral/Profesional", "Spontan/Tertawa", "Serius/Fashion", "Menikmati (Mata Tertutup)", "Fokus", "Terkejut Senang"];

/// Product catalog grouped by industry.
pub const PRODUCT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Fashion & Accessories", &["Kaos (T-Shirt)", "Hoodie/Sweater", "Jaket/Outer", "Gaun (Dress)", "Celana Jeans", "Sepatu Sneakers", "Sepatu Formal", "Tas Tangan", "Ransel", "Jam Tangan", "Kacamata", "Perhiasan (Kalung/Cincin)", "Topi"]),
    ("Electronics & Gadgets", &["Smartphone", "Laptop", "Headphone", "Earbuds/TWS", "Kamera", "Smartwatch", "Tablet", "Speaker Portable"]),
    ("Beauty & Personal Care", &["Botol Skincare/Serum", "Lipstik/Gincu", "Palet Makeup", "Botol Parfum", "Shampo/Sabun", "Lilin Aromaterapi"]),
    ("Food & Culinary", &["Burger/Sandwich", "Sushi/Jepang", "Pizza", "Steak/Daging", "Ramen/Mie", "Salad Bowl", "Kue/Pastry", "Donat", "Nasi Goreng"]),
    ("Beverages", &["Kopi/Latte", "Teh/Matcha", "Minuman Kaleng", "Jus Buah", "Botol Air Mineral", "Minuman Boba", "Cocktail/Mocktail"]),
    ("Home & Decor", &["Mug/Gelas", "Vas Bunga", "Buku Catatan", "Lampu Meja", "Bantal Sofa", "Tanaman Hias"]),
    ("Sports & Hobbies", &["Dumbbell/Alat Gym", "Matras Yoga", "Raket", "Bola", "Botol Minum Olahraga", "Sepeda"]),
    ("Toys & Kids", &["Boneka", "Mobil-mobilan", "Blok Bangunan", "Buku Mewarnai"]),
];

pub const INTERACTION_TYPES: &[&str] = &[
    "Memakai/Mengenakan",
    "Memegang Secara Alami",
    "Menunjukkan ke Kamera",
    "Menggunakan/Mengoperasikan",
    "Mengkonsumsi (Makan/Minum)",
    "Menyesap/Mencicipi",
    "Membuka Kemasan (Unboxing)",
    "Mencoba/Testing",
    "Berpose di Samping",
    "Menatap Produk",
    "Hanya Sebagai Latar Belakang",
];

pub const POSE_OPTIONS: &[&str] = &[
    "Berdiri Tegak",
    "Duduk Santai",
    "Berjalan",
    "Dekat Wajah",
    "Flatlay dengan Tangan",
    "Candid/Spontan",
    "Headshot (Fokus Wajah)",
    "Action Shot",
    "Close-up Tangan",
];

pub const ENVIRONMENT_OPTIONS: &[&str] = &[
    "Studio Bersih (Putih)",
    "Studio Minimalis Krem",
    "Kafe Modern",
    "Urban/Jalanan Kota",
    "Taman/Outdoor",
    "Interior Mewah",
    "Kantor Modern",
    "Tepi Pantai",
    "Dapur Estetik",
    "Gym/Pusat Kebugaran",
    "Restoran/Dining Area",
    "Kamar Tidur Nyaman",
];

pub const LIGHTING_OPTIONS: &[&str] = &["Cahaya Alami", "Softbox Studio", "Golden Hour", "Sinematik", "Terang (High-key)", "Hangat/Moody", "Neon/Futuristik"];
pub const STYLE_OPTIONS: &[&str] = &["Minimalis", "Mewah", "Lifestyle", "Editorial", "Katalog", "Vintage", "Hyper-Realistic"];

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct LabeledOption<T> {
    pub label: &'static str,
    pub value: T,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub group: &'static str,
    pub categories: &'static [&'static str],
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    pub model: ModelConfig,
    pub product: ProductConfig,
    pub scene: SceneConfig,
}

/// Everything the client needs to render the configuration form.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OptionCatalog {
    pub genders: &'static [&'static str],
    pub ages: &'static [&'static str],
    pub ethnicities: &'static [&'static str],
    pub hair_styles: &'static [&'static str],
    pub expressions: &'static [&'static str],
    pub product_categories: Vec<CategoryGroup>,
    pub interaction_types: &'static [&'static str],
    pub poses: &'static [&'static str],
    pub environments: &'static [&'static str],
    pub lighting: &'static [&'static str],
    pub styles: &'static [&'static str],
    pub aspect_ratios: Vec<LabeledOption<AspectRatio>>,
    pub resolutions: Vec<LabeledOption<ImageSize>>,
    pub defaults: Defaults,
}

pub fn aspect_ratio_label(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Square => "1:1 (Persegi)",
        AspectRatio::Portrait => "3:4 (Instagram)",
        AspectRatio::Landscape => "4:3 (Lanskap)",
        AspectRatio::Story => "9:16 (Story/TikTok)",
        AspectRatio::Widescreen => "16:9 (Banner)",
    }
}

pub fn resolution_label(size: ImageSize) -> &'static str {
    match size {
        ImageSize::Standard => "Standar (1K)",
        ImageSize::High => "Definisi Tinggi (2K)",
        ImageSize::Professional => "Profesional (4K)",
    }
}

pub fn all_categories() -> impl Iterator<Item = &'static str> {
    PRODUCT_CATEGORIES.iter().flat_map(|(_, items)| items.iter().copied())
}

pub fn is_known_category(category: &str) -> bool {
    all_categories().any(|c| c == category)
}

pub fn option_catalog() -> OptionCatalog {
    OptionCatalog {
        genders: GENDER_OPTIONS,
        ages: AGE_OPTIONS,
        ethnicities: ETHNICITY_OPTIONS,
        hair_styles: HAIR_OPTIONS,
        expressions: EXPRESSION_OPTIONS,
        product_categories: PRODUCT_CATEGORIES.iter().map(|&(group, categories)| CategoryGroup { group, categories }).collect(),
        interaction_types: INTERACTION_TYPES,
        poses: POSE_OPTIONS,
        environments: ENVIRONMENT_OPTIONS,
        lighting: LIGHTING_OPTIONS,
        styles: STYLE_OPTIONS,
        aspect_ratios: AspectRatio::ALL.into_iter().map(|value| LabeledOption { label: aspect_ratio_label(value), value }).collect(),
        resolutions: ImageSize::ALL.into_iter().map(|value| LabeledOption { label: resolution_label(value), value }).collect(),
        defaults: Defaults { model: ModelConfig::default(), product: ProductConfig::default(), scene: SceneConfig::default() },
    }
}
