//! The fixed grocery category taxonomy used to group the shopping list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ClassificationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Meat,
    Fish,
    Dairy,
    Vegetables,
    Fruit,
    Spices,
    DryGoods,
    Bread,
    Preserves,
    Sauces,
    Beverages,
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 12] = [
        Category::Meat,
        Category::Fish,
        Category::Dairy,
        Category::Vegetables,
        Category::Fruit,
        Category::Spices,
        Category::DryGoods,
        Category::Bread,
        Category::Preserves,
        Category::Sauces,
        Category::Beverages,
        Category::Other,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Category::Meat => "meat",
            Category::Fish => "fish",
            Category::Dairy => "dairy",
            Category::Vegetables => "vegetables",
            Category::Fruit => "fruit",
            Category::Spices => "spices",
            Category::DryGoods => "dry-goods",
            Category::Bread => "bread",
            Category::Preserves => "preserves",
            Category::Sauces => "sauces",
            Category::Beverages => "beverages",
            Category::Other => "other",
        }
    }

    /// Swedish label, as shown to users and as answered by the classifier model.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Meat => "kött",
            Category::Fish => "fisk",
            Category::Dairy => "mejeri",
            Category::Vegetables => "grönsaker",
            Category::Fruit => "frukt",
            Category::Spices => "kryddor",
            Category::DryGoods => "torrvaror",
            Category::Bread => "bröd",
            Category::Preserves => "konserver",
            Category::Sauces => "såser",
            Category::Beverages => "dryck",
            Category::Other => "övrigt",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        KEYWORD_HINTS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }

    /// Local keyword lookup; the longest contained keyword wins, ties go to
    /// the category listed first.
    pub fn from_keywords(item: &str) -> Option<Category> {
        let lower = item.to_lowercase();
        let mut best: Option<(usize, Category)> = None;

        for (category, keywords) in KEYWORD_HINTS {
            for keyword in keywords.iter() {
                let len = keyword.chars().count();
                if lower.contains(keyword) && best.map_or(true, |(best_len, _)| len > best_len) {
                    best = Some((len, *category));
                }
            }
        }

        best.map(|(_, category)| category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ClassificationError;

    /// Accepts the tag or the Swedish label, ignoring case, surrounding
    /// whitespace and trailing punctuation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_end_matches(|c: char| c == '.' || c == '!')
            .trim()
            .to_lowercase();

        Category::ALL
            .iter()
            .find(|category| category.tag() == normalized || category.label() == normalized)
            .copied()
            .ok_or_else(|| ClassificationError::UnknownLabel(s.trim().to_string()))
    }
}

static KEYWORD_HINTS: &[(Category, &[&str])] = &[
    (
        Category::Meat,
        &[
            "kött", "fläsk", "kyckling", "nöt", "lamm", "korv", "bacon", "skinka", "köttfärs",
            "biff", "entrecôte", "oxfilé", "kalv", "färs", "kotlett", "karré", "revben",
            "rostbiff", "kassler", "pulled", "salami", "chorizo", "prosciutto",
        ],
    ),
    (
        Category::Fish,
        &[
            "lax", "torsk", "räkor", "fisk", "skaldjur", "tonfisk", "sej", "makrill", "krabba",
            "hummer", "musslor", "rödspätta", "sill", "kaviar", "kräftor", "havskatt", "kolja",
            "sardiner", "ansjovis",
        ],
    ),
    (
        Category::Dairy,
        &[
            "mjölk", "grädde", "ost", "smör", "yoghurt", "crème fraiche", "kvarg", "filmjölk",
            "keso", "färskost", "mozzarella", "parmesan", "cheddar", "cream cheese",
            "mascarpone", "ricotta", "ägg", "halloumi", "fetaost",
        ],
    ),
    (
        Category::Vegetables,
        &[
            "tomat", "sallad", "gurka", "morot", "lök", "vitlök", "paprika", "broccoli",
            "spenat", "zucchini", "aubergine", "squash", "pumpa", "kål", "blomkål", "rödkål",
            "vitkål", "grönkål", "rödlök", "gul lök", "purjolök", "salladslök", "sparris",
            "kronärtskocka", "rödbetor", "palsternacka", "selleri", "fänkål", "champinjoner",
            "svamp", "potatis", "sötpotatis", "morötter", "ärtor", "majs", "avokado", "ruccola",
            "mangold", "sockerärtor", "haricots verts",
        ],
    ),
    (
        Category::Fruit,
        &[
            "äpple", "citron", "lime", "apelsin", "banan", "bär", "päron", "plommon", "persika",
            "nektarin", "mango", "ananas", "vindruvor", "granatäpple", "fikon", "dadlar",
            "hallon", "blåbär", "jordgubbar", "björnbär", "lingon", "tranbär", "passionsfrukt",
            "kiwi", "clementin", "mandarin",
        ],
    ),
    (
        Category::Spices,
        &[
            "salt", "peppar", "basilika", "oregano", "timjan", "rosmarin", "kanel",
            "kardemumma", "ingefära", "curry", "spiskummin", "paprikapulver", "cayenne",
            "chili", "muskotnöt", "nejlika", "saffran", "vanilj", "lagerblad", "persilja",
            "dill", "koriander", "dragon", "salvia", "gurkmeja", "anis", "vitpeppar",
            "svartpeppar",
        ],
    ),
    (
        Category::DryGoods,
        &[
            "pasta", "ris", "mjöl", "socker", "nötter", "linser", "bönor", "couscous", "quinoa",
            "bulgur", "havregryn", "cornflakes", "müsli", "mandel", "valnötter", "cashewnötter",
            "pinjenötter", "sesamfrön", "chiafrön", "solrosfrön", "pumpakärnor", "kokos",
            "russin", "kikärtor", "majsstärkelse", "potatismjöl", "bakpulver", "jäst",
            "ströbröd",
        ],
    ),
    (
        Category::Bread,
        &[
            "bröd", "tortilla", "wrap", "hamburgerbröd", "pitabröd", "tunnbröd", "knäckebröd",
            "baguette", "ciabatta", "focaccia", "surdegsbröd", "rågbröd", "toast", "korvbröd",
            "tekaka", "scones",
        ],
    ),
    (
        Category::Preserves,
        &[
            "konserv", "burk", "krossade tomater", "tomatpuré", "kokosmjölk", "kokosgrädde",
            "oliver", "kapris", "soltorkade tomater", "inlagd", "syltad", "marinerad",
            "passerade tomater", "tomatpasta",
        ],
    ),
    (
        Category::Sauces,
        &[
            "sås", "ketchup", "majonnäs", "senap", "soja", "vinäger", "olja", "olivolja",
            "rapsolja", "sesamolja", "balsamico", "worcestershire", "tabasco", "sriracha",
            "sweet chilisås", "pesto", "aioli", "dressing",
        ],
    ),
    (
        Category::Beverages,
        &[
            "vin", "öl", "juice", "läsk", "vatten", "buljong", "fond", "mineralvatten", "cider",
            "cognac", "whisky", "rom", "likör",
        ],
    ),
];
