//! Static scene catalog.
//!
//! The catalog is leaf data: scene records, their characters and the
//! vocabulary practiced in each scene. Lookups never mutate it.

use super::model::{Character, Scene, Word};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Scene used whenever a table has no entry for the requested scene.
pub const DEFAULT_SCENE_ID: &str = "restaurant";

// (id, title, description, level, vocabulary, [(role id, name, description, avatar)])
type RawScene = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str, &'static str, &'static str)],
);

const SCENES: &[RawScene] = &[
    (
        "coffee_shop",
        "咖啡馆聊天",
        "在咖啡馆与朋友或店员交流，练习日常英语对话",
        "入门",
        "咖啡、饮品、聊天、休闲",
        &[
            ("customer", "顾客", "在咖啡馆消费的顾客", "👤"),
            ("barista", "咖啡师", "咖啡馆的工作人员", "☕"),
        ],
    ),
    (
        "store",
        "商场购物",
        "在商场购物时与店员交流，练习购物相关英语",
        "初级",
        "商品、价格、尺码、支付",
        &[
            ("customer", "顾客", "在商店购物的顾客", "👜"),
            ("salesperson", "店员", "商店的销售人员", "👨‍💼"),
        ],
    ),
    (
        "restaurant",
        "餐馆点餐",
        "在西餐厅体验点餐过程，练习餐饮相关英语表达",
        "初级",
        "菜单、食物、饮品、点餐用语",
        &[
            ("customer", "顾客", "餐厅顾客，需要点餐和询问菜品", "👤"),
            ("waiter", "服务员", "餐厅服务员，提供菜单和服务", "👨‍🍳"),
        ],
    ),
    (
        "taxi",
        "出租车出行",
        "乘坐出租车时与司机交流，练习方位和交通相关英语",
        "初级",
        "地点、方向、交通、时间",
        &[
            ("passenger", "乘客", "需要前往特定地点的乘客", "👤"),
            ("driver", "司机", "出租车司机，提供接送服务", "🚕"),
        ],
    ),
    (
        "airport",
        "机场办理",
        "在机场办理登机手续，练习旅行相关英语对话",
        "中级",
        "登机、行李、航班、航站楼",
        &[
            ("passenger", "乘客", "需要办理登机手续的旅客", "🧳"),
            ("checkin_agent", "地勤人员", "机场办理登机手续的工作人员", "👩‍✈️"),
        ],
    ),
    (
        "hospital",
        "医院就诊",
        "在医院看病时与医生交流，学习医疗相关英语表达",
        "中级",
        "症状、疾病、药品、治疗",
        &[
            ("patient", "病人", "前往医院就诊的患者", "🤒"),
            ("doctor", "医生", "为病人诊断和治疗的医生", "👨‍⚕️"),
            ("nurse", "护士", "协助医生并照顾病人的护士", "👩‍⚕️"),
        ],
    ),
    (
        "business",
        "商务会议",
        "参与商务会议，学习商务英语表达和谈判技巧",
        "高级",
        "商务术语、会议用语、谈判技巧",
        &[
            ("participant", "参会者", "参加会议的商务人士", "👨‍💼"),
            ("presenter", "主讲人", "在会议上做演示的人", "📊"),
            ("chair", "主持人", "主持会议的人", "👥"),
        ],
    ),
];

// scene id -> [(word, pronunciation, meaning, example)]
type RawWords = (
    &'static str,
    &'static [(&'static str, &'static str, &'static str, &'static str)],
);

const WORDS: &[RawWords] = &[
    (
        "restaurant",
        &[
            ("menu", "/ˈmenjuː/", "菜单", "Can I see the menu, please?"),
            ("order", "/ˈɔːrdər/", "点餐", "I'd like to order the steak."),
            ("recommend", "/ˌrekəˈmend/", "推荐", "What would you recommend?"),
        ],
    ),
    (
        "airport",
        &[
            ("boarding pass", "/ˈbɔːrdɪŋ pæs/", "登机牌", "Do I need to print my boarding pass?"),
            ("check in", "/tʃek ɪn/", "办理登机手续", "When should I check in for my flight?"),
            ("baggage", "/ˈbæɡɪdʒ/", "行李", "How many pieces of baggage can I check?"),
        ],
    ),
    (
        "taxi",
        &[
            ("fare", "/fer/", "费用", "What's the fare to the airport?"),
            ("destination", "/ˌdestɪˈneɪʃn/", "目的地", "My destination is the central station."),
            ("traffic", "/ˈtræfɪk/", "交通", "Is there a lot of traffic today?"),
        ],
    ),
    (
        "hospital",
        &[
            ("symptom", "/ˈsɪmptəm/", "症状", "What are your symptoms?"),
            ("prescription", "/prɪˈskrɪpʃn/", "处方", "The doctor gave me a prescription."),
            ("examine", "/ɪɡˈzæmɪn/", "检查", "The doctor will examine you now."),
        ],
    ),
    (
        "coffee_shop",
        &[
            ("latte", "/ˈlɑːteɪ/", "拿铁咖啡", "I'd like a latte with almond milk."),
            ("pastry", "/ˈpeɪstri/", "糕点", "Can I get a pastry with my coffee?"),
            ("barista", "/bəˈriːstə/", "咖啡师", "The barista makes excellent coffee."),
        ],
    ),
    (
        "store",
        &[
            ("size", "/saɪz/", "尺码", "What size do you wear?"),
            ("discount", "/ˈdɪskaʊnt/", "折扣", "Is there a discount on this item?"),
            ("fitting room", "/ˈfɪtɪŋ ruːm/", "试衣间", "Where is the fitting room?"),
        ],
    ),
    (
        "business",
        &[
            ("update", "/ˈʌpdeɪt/", "更新", "Could you give me an update on the project?"),
            ("launch", "/lɔːntʃ/", "推出", "We plan to launch the new product next month."),
            ("strategy", "/ˈstrætədʒi/", "策略", "What's our marketing strategy?"),
        ],
    ),
];

static BUILTIN: Lazy<SceneCatalog> = Lazy::new(|| {
    let scenes = SCENES
        .iter()
        .map(|(id, title, description, level, vocabulary, characters)| Scene {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            level: level.to_string(),
            vocabulary: vocabulary.to_string(),
            characters: characters
                .iter()
                .map(|(id, name, description, avatar)| Character {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    avatar: avatar.to_string(),
                })
                .collect(),
        })
        .collect();

    let words = WORDS
        .iter()
        .map(|(scene_id, entries)| {
            let list = entries
                .iter()
                .zip(1u32..)
                .map(|((word, pronunciation, meaning, example), id)| Word {
                    id,
                    word: word.to_string(),
                    pronunciation: pronunciation.to_string(),
                    meaning: meaning.to_string(),
                    example: example.to_string(),
                })
                .collect();
            (scene_id.to_string(), list)
        })
        .collect();

    SceneCatalog { scenes, words }
});

/// Read-only collection of scenes and their vocabulary.
#[derive(Debug, Clone, Default)]
pub struct SceneCatalog {
    scenes: Vec<Scene>,
    words: HashMap<String, Vec<Word>>,
}

impl SceneCatalog {
    /// Creates a catalog from explicit data.
    pub fn new(scenes: Vec<Scene>, words: HashMap<String, Vec<Word>>) -> Self {
        Self { scenes, words }
    }

    /// Returns the built-in catalog with the seven practice scenes.
    pub fn builtin() -> &'static SceneCatalog {
        &BUILTIN
    }

    /// All scenes in display order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Looks up a scene by id.
    pub fn find(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Vocabulary for a scene, falling back to the default scene's list.
    pub fn words_for(&self, scene_id: &str) -> Vec<Word> {
        self.words
            .get(scene_id)
            .or_else(|| self.words.get(DEFAULT_SCENE_ID))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_all_scenes() {
        let catalog = SceneCatalog::builtin();
        let ids: Vec<&str> = catalog.scenes().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "coffee_shop",
                "store",
                "restaurant",
                "taxi",
                "airport",
                "hospital",
                "business"
            ]
        );
    }

    #[test]
    fn test_find_unknown_scene() {
        assert!(SceneCatalog::builtin().find("moon_base").is_none());
    }

    #[test]
    fn test_words_fall_back_to_default_scene() {
        let catalog = SceneCatalog::builtin();
        let fallback = catalog.words_for("moon_base");
        let restaurant = catalog.words_for(DEFAULT_SCENE_ID);

        assert_eq!(fallback, restaurant);
        assert_eq!(restaurant[0].word, "menu");
    }

    #[test]
    fn test_word_ids_are_sequential_per_scene() {
        let words = SceneCatalog::builtin().words_for("hospital");
        let ids: Vec<u32> = words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
