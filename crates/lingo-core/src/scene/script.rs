//! Canned dialogue tables.
//!
//! Three tables back the simulated conversation partner:
//! - opening scripts seeded when a role is picked,
//! - reply pools the AI draws from after each user turn,
//! - quick phrases offered to the learner as input shortcuts.
//!
//! All tables are keyed by `(scene id, user role id)`.

use super::catalog::DEFAULT_SCENE_ID;
use crate::session::{DialogueTurn, Sender};

/// Reply used when neither the scene nor the default scene has a pool for the role.
pub const GENERIC_REPLY: CannedReply = CannedReply {
    text: "Thank you for sharing that with me! Could you tell me more about it?",
    translation: "感谢您与我分享！您能告诉我更多关于它的信息吗？",
};

/// A line of a pre-scripted opening dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine {
    pub sender: Sender,
    pub text: &'static str,
    pub translation: &'static str,
    /// Character speaking the line.
    pub role: &'static str,
}

impl ScriptLine {
    /// Converts the line into a dialogue turn with the given id.
    pub fn to_turn(&self, id: u64) -> DialogueTurn {
        DialogueTurn {
            id,
            sender: self.sender,
            text: self.text.to_string(),
            translation: Some(self.translation.to_string()),
            role: self.role.to_string(),
        }
    }
}

/// An AI reply together with its translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedReply {
    pub text: &'static str,
    pub translation: &'static str,
}

type Keyed<T> = &'static [(&'static str, &'static [(&'static str, &'static [T])])];

const fn ai(role: &'static str, text: &'static str, translation: &'static str) -> ScriptLine {
    ScriptLine {
        sender: Sender::Ai,
        text,
        translation,
        role,
    }
}

const fn user(role: &'static str, text: &'static str, translation: &'static str) -> ScriptLine {
    ScriptLine {
        sender: Sender::User,
        text,
        translation,
        role,
    }
}

const fn reply(text: &'static str, translation: &'static str) -> CannedReply {
    CannedReply { text, translation }
}

const OPENING_SCRIPTS: Keyed<ScriptLine> = &[
    (
        "restaurant",
        &[
            (
                "customer",
                &[
                    ai("waiter", "Good evening! Welcome to our restaurant. May I show you to your table?", "晚上好！欢迎光临我们的餐厅。我可以带您到座位吗？"),
                    user("customer", "Yes, thank you. Can we get a table by the window?", "好的，谢谢。我们能要一张靠窗的桌子吗？"),
                    ai("waiter", "Of course! Right this way, please. Here's our menu. Would you like to start with some drinks?", "当然可以！这边请。这是我们的菜单。您想先喝点什么吗？"),
                ],
            ),
            (
                "waiter",
                &[
                    ai("customer", "Good evening! My name is John. I'm here to enjoy a nice dinner. Do you have any recommendations?", "晚上好！我叫约翰。我来这里享用一顿美味的晚餐。你有什么推荐吗？"),
                    user("waiter", "Welcome, John! Our chef's special tonight is the grilled salmon with lemon butter sauce. It's very popular.", "欢迎，约翰！我们今晚的主厨推荐是烤三文鱼配柠檬黄油酱。非常受欢迎。"),
                    ai("customer", "That sounds delicious. I'll have that, please. What side dishes would you recommend?", "听起来很美味。请给我来一份。你推荐什么配菜？"),
                ],
            ),
        ],
    ),
    (
        "airport",
        &[
            (
                "passenger",
                &[
                    ai("checkin_agent", "Good morning! Welcome to Sky Airlines. May I see your passport and flight ticket, please?", "早上好！欢迎光临天空航空公司。请出示您的护照和机票好吗？"),
                    user("passenger", "Good morning! Here you are. I'm flying to New York today.", "早上好！给你。我今天要飞往纽约。"),
                    ai("checkin_agent", "Thank you. Let me check... Your flight is on time. How many bags would you like to check in?", "谢谢。让我查一下...您的航班准点。您有多少件行李要托运？"),
                ],
            ),
            (
                "checkin_agent",
                &[
                    ai("passenger", "Hi there! I'm flying to London today. How do I check in for my flight?", "你好！我今天要飞往伦敦。我该如何办理登机手续？"),
                    user("checkin_agent", "Hello! I can help you with that. May I see your passport and flight details, please?", "你好！我可以帮你办理。请出示您的护照和航班信息好吗？"),
                    ai("passenger", "Sure, here you go. I have one suitcase to check in.", "当然，给你。我有一个手提箱要托运。"),
                ],
            ),
        ],
    ),
    (
        "taxi",
        &[
            (
                "passenger",
                &[
                    ai("driver", "Hello! Where are you heading today?", "你好！今天你要去哪里？"),
                    user("passenger", "Hi! I need to get to the central station. What's the fare?", "你好！我需要去中央车站。费用是多少？"),
                    ai("driver", "It should be around $15, depending on traffic. Hop in, please!", "视交通情况而定，大约15美元。请上车！"),
                ],
            ),
            (
                "driver",
                &[
                    ai("passenger", "Hi driver! Can you take me to the airport, please? I'm in a bit of a hurry.", "嗨，司机！请你送我去机场好吗？我有点赶时间。"),
                    user("driver", "No problem! Buckle up and I'll get you there as quickly as possible. Which terminal do you need?", "没问题！系好安全带，我会尽快送你到那里。你需要去哪个航站楼？"),
                    ai("passenger", "Terminal 3, please. How long do you think it will take?", "请去3号航站楼。你认为需要多长时间？"),
                ],
            ),
        ],
    ),
    (
        "hospital",
        &[
            (
                "patient",
                &[
                    ai("doctor", "Good morning. I'm Dr. Smith. What seems to be the problem today?", "早上好。我是史密斯医生。今天有什么不舒服吗？"),
                    user("patient", "Good morning, doctor. I've been feeling feverish and have a sore throat for the past two days.", "早上好，医生。过去两天我一直发烧，喉咙痛。"),
                    ai("doctor", "Let me check your temperature and examine your throat. Please open wide...", "让我量一下你的体温，检查一下你的喉咙。请张大嘴..."),
                ],
            ),
            (
                "doctor",
                &[
                    ai("patient", "Hello doctor. I've been having a terrible headache and feeling dizzy.", "你好，医生。我头痛得厉害，感觉头晕。"),
                    user("doctor", "Hello. I'm Dr. Johnson. How long have you been experiencing these symptoms?", "你好。我是约翰逊医生。你出现这些症状有多久了？"),
                    ai("patient", "About three days now. It started with a mild headache, but it's getting worse.", "大约三天了。一开始只是轻微头痛，但现在越来越严重了。"),
                ],
            ),
            (
                "nurse",
                &[
                    ai("patient", "Nurse, I don't feel well. My stomach is hurting a lot.", "护士，我感觉不舒服。我的胃疼得很厉害。"),
                    user("nurse", "I'm Nurse Lisa. I'll let the doctor know. Can you tell me more about your pain?", "我是丽莎护士。我会告诉医生的。你能详细说说你的疼痛情况吗？"),
                    ai("patient", "It's a sharp pain in my upper abdomen. It started after lunch.", "上腹部剧痛。午饭后开始的。"),
                ],
            ),
        ],
    ),
    (
        "coffee_shop",
        &[
            (
                "customer",
                &[
                    ai("barista", "Welcome to Brew Haven! What can I get for you today?", "欢迎来到Brew Haven！今天我能为您做些什么？"),
                    user("customer", "Hi! I'd like a latte, please. With almond milk if possible.", "你好！我想要一杯拿铁。如果可能的话，用杏仁奶。"),
                    ai("barista", "Absolutely! A latte with almond milk. Would you like anything else? A pastry or a cookie?", "当然可以！一杯杏仁奶拿铁。你还想要别的吗？糕点或饼干？"),
                ],
            ),
            (
                "barista",
                &[
                    ai("customer", "Hey there! What's your specialty today? I'm looking for something new.", "嘿！今天有什么特色饮品？我想尝试点新的东西。"),
                    user("barista", "We have a new seasonal special: the pumpkin spice latte. It's very popular right now.", "我们有一款新的季节性特色饮品：南瓜香料拿铁。现在非常受欢迎。"),
                    ai("customer", "That sounds perfect! I'll try that. Make it a large, please.", "听起来很完美！我要试试那个。请做成大杯的。"),
                ],
            ),
        ],
    ),
    (
        "store",
        &[
            (
                "customer",
                &[
                    ai("salesperson", "Welcome to Style Shop! Is there anything specific you're looking for today?", "欢迎来到Style Shop！今天您有什么特别想找的吗？"),
                    user("customer", "Hi! I'm looking for a new winter jacket. Do you have any recommendations?", "你好！我想买一件新的冬季夹克。你有什么推荐吗？"),
                    ai("salesperson", "Absolutely! We have a great selection over here. What size do you wear?", "当然！我们这边有很多选择。您穿什么尺码？"),
                ],
            ),
            (
                "salesperson",
                &[
                    ai("customer", "Excuse me, could you help me find a dress for a formal event?", "打扰一下，你能帮我找一件正式场合穿的连衣裙吗？"),
                    user("salesperson", "Of course! I'd be happy to help. What style are you looking for? Long or short?", "当然可以！我很乐意帮忙。您想要什么风格的？长款还是短款？"),
                    ai("customer", "I think a long dress would be better. Maybe something in navy blue?", "我觉得长款会更好。也许是藏青色的？"),
                ],
            ),
        ],
    ),
    (
        "business",
        &[
            (
                "participant",
                &[
                    ai("chair", "Good morning everyone. Let's start our meeting. First, I'd like to hear updates from each team.", "大家早上好。让我们开始会议。首先，我想听听每个团队的最新情况。"),
                    user("participant", "Good morning. Our team has made significant progress on the marketing campaign. We're ready to launch next week.", "早上好。我们团队在营销活动方面取得了重大进展。我们准备下周启动。"),
                    ai("chair", "Excellent news! Could you share some key details about the campaign strategy?", "好消息！你能分享一些关于活动策略的关键细节吗？"),
                ],
            ),
            (
                "presenter",
                &[
                    ai("chair", "Now, let's welcome our product manager to present the new features.", "现在，让我们欢迎我们的产品经理来介绍新功能。"),
                    user("presenter", "Thank you. Today I'll be presenting our Q4 roadmap. Let me start with an overview of our key objectives...", "谢谢。今天我将介绍我们的第四季度路线图。让我先概述一下我们的关键目标..."),
                    ai("participant", "That looks impressive. Could you elaborate on the timeline for the mobile app update?", "看起来很令人印象深刻。你能详细说明一下移动应用更新的时间线吗？"),
                ],
            ),
            (
                "chair",
                &[
                    ai("participant", "Thanks for organizing this meeting. I think we need to discuss the budget allocation first.", "谢谢你组织这次会议。我认为我们首先需要讨论预算分配问题。"),
                    user("chair", "Thank you for joining today. Let's start with the agenda. First item: budget allocation for Q3.", "感谢今天的参与。让我们从议程开始。第一项：第三季度的预算分配。"),
                    ai("participant", "Our team has prepared a detailed proposal. Would you like me to walk everyone through it?", "我们团队已经准备了一份详细的提案。你想让我向大家详细介绍一下吗？"),
                ],
            ),
        ],
    ),
];

const REPLY_POOLS: Keyed<CannedReply> = &[
    (
        "restaurant",
        &[
            (
                "customer",
                &[
                    reply("Your order will be ready in about 15 minutes. Would you like some bread while you wait?", "您的订单将在15分钟左右准备好。您想在等待时来点面包吗？"),
                    reply("I'm happy to hear that! Is there anything else I can get for you?", "很高兴听到您这么说！我还能为您拿点什么吗？"),
                    reply("Our chef makes the best desserts. Would you like to see the dessert menu?", "我们的厨师做的甜点最好吃。您想看看甜点菜单吗？"),
                ],
            ),
            (
                "waiter",
                &[
                    reply("That sounds delicious. Can I also get a glass of red wine to go with it?", "听起来很美味。我还能来一杯红葡萄酒搭配吗？"),
                    reply("The service here is excellent. How long have you been working here?", "这里的服务很棒。您在这里工作多久了？"),
                    reply("I think I'm ready for the bill now. Could you bring it please?", "我想现在可以结账了。请拿账单给我好吗？"),
                ],
            ),
        ],
    ),
    (
        "airport",
        &[
            (
                "passenger",
                &[
                    reply("Here's your boarding pass. Your gate is A12, and boarding starts in 45 minutes.", "这是您的登机牌。您的登机口是A12，登机将在45分钟后开始。"),
                    reply("Your luggage will be checked through to your final destination. Have a nice flight!", "您的行李将直接托运到您的最终目的地。祝您旅途愉快！"),
                    reply("If you need any assistance in the terminal, please don't hesitate to ask our staff.", "如果您在航站楼内需要任何帮助，请随时询问我们的工作人员。"),
                ],
            ),
            (
                "checkin_agent",
                &[
                    reply("Thank you. How much time should I allow to get to the gate?", "谢谢。我需要留出多少时间到达登机口？"),
                    reply("Is there a lounge I can use before my flight?", "在飞行前我可以使用休息室吗？"),
                    reply("What time do I need to be at the gate for boarding?", "我需要什么时候到达登机口准备登机？"),
                ],
            ),
        ],
    ),
    (
        "taxi",
        &[
            (
                "passenger",
                &[
                    reply("We should be there in about 20 minutes if traffic stays good.", "如果交通保持良好，我们应该在20分钟左右到达那里。"),
                    reply("Would you like me to take the highway to get there faster?", "您想让我走高速公路更快到达那里吗？"),
                    reply("Here we are. That'll be $15.50. Do you need a receipt?", "我们到了。总共是15.50美元。您需要收据吗？"),
                ],
            ),
            (
                "driver",
                &[
                    reply("Could you please drive a bit slower? I'm not in a hurry.", "请您开慢一点好吗？我不赶时间。"),
                    reply("Do you know any good restaurants in this area?", "您知道这附近有什么好的餐厅吗？"),
                    reply("How long have you been driving a taxi?", "您开出租车多久了？"),
                ],
            ),
        ],
    ),
];

const QUICK_PHRASES: Keyed<&'static str> = &[
    (
        "restaurant",
        &[
            ("customer", &["Could I see the menu, please?", "What would you recommend today?", "Can I have the steak medium-rare?", "Do you have any vegetarian options?", "Could I get a glass of water, please?"]),
            ("waiter", &["Welcome to our restaurant! How many people are in your party?", "May I take your order?", "Would you like some wine with your meal?", "Is everything to your liking?", "Would you like dessert today?"]),
        ],
    ),
    (
        "airport",
        &[
            ("passenger", &["Where is the check-in counter for my flight?", "How many bags can I check for free?", "What time does boarding start?", "Is there a lounge I can use?", "What gate is my flight departing from?"]),
            ("checkin_agent", &["Good morning! May I see your passport and ticket?", "Would you like a window or aisle seat?", "Do you have any baggage to check?", "Your flight is on time. Have a nice trip!", "Your boarding pass and passport, please."]),
        ],
    ),
    (
        "taxi",
        &[
            ("passenger", &["Could you take me to the central station?", "How much will the fare be?", "Is the meter running?", "Could you drive a bit faster? I'm in a hurry.", "Could you please stop here?"]),
            ("driver", &["Where to?", "Hop in!", "We should be there in about 15 minutes.", "That'll be $20, please.", "Do you need a receipt?"]),
        ],
    ),
    (
        "hospital",
        &[
            ("patient", &["I've been feeling sick for a few days.", "I have a fever and a sore throat.", "How often should I take this medication?", "Is there anything I should avoid eating?", "When should I come back for a follow-up?"]),
            ("doctor", &["What seems to be the problem?", "How long have you been experiencing these symptoms?", "Let me examine you.", "I'll prescribe some medication for you.", "You should rest and drink plenty of fluids."]),
            ("nurse", &["I'm here to take your vital signs.", "The doctor will see you shortly.", "Please take this medication after meals.", "Do you have any allergies?", "Let me bandage that wound for you."]),
        ],
    ),
    (
        "coffee_shop",
        &[
            ("customer", &["Can I get a latte, please?", "What's your special today?", "Can I have it with almond milk?", "Do you have any pastries?", "How much is this?"]),
            ("barista", &["Welcome! What can I get for you today?", "Would you like that hot or iced?", "Do you want any syrup in it?", "That'll be $4.50, please.", "Enjoy your coffee!"]),
        ],
    ),
    (
        "store",
        &[
            ("customer", &["Where are the fitting rooms?", "Do you have this in a smaller size?", "Is there a discount on this item?", "Can I pay with a credit card?", "Do you offer refunds?"]),
            ("salesperson", &["Can I help you find anything?", "What size are you looking for?", "This style is very popular right now.", "We have a sale going on this week.", "Would you like me to gift-wrap it?"]),
        ],
    ),
    (
        "business",
        &[
            ("participant", &["Could you elaborate on that point?", "What are our next steps?", "I agree with your assessment.", "We need to consider the budget constraints.", "Let's schedule a follow-up meeting."]),
            ("presenter", &["Let me walk you through our proposal.", "As you can see from the chart...", "Our key objectives are...", "This will help us achieve...", "Are there any questions so far?"]),
            ("chair", &["Let's get started with today's agenda.", "First, let's hear from the marketing team.", "Could you summarize the main points?", "Let's move on to the next item.", "Thank you everyone for your contributions."]),
        ],
    ),
];

const DEFAULT_QUICK_PHRASES: &[&str] = &[
    "Could you please explain that in more detail?",
    "I understand what you mean.",
    "That's a great point!",
    "I have a question about that.",
    "I agree with you completely.",
];

fn scene_table<T: 'static>(table: Keyed<T>, scene_id: &str) -> Option<&'static [(&'static str, &'static [T])]> {
    table
        .iter()
        .find(|(id, _)| *id == scene_id)
        .map(|(_, roles)| *roles)
}

fn role_entry<T: 'static>(roles: &'static [(&'static str, &'static [T])], role_id: &str) -> Option<&'static [T]> {
    roles
        .iter()
        .find(|(id, _)| *id == role_id)
        .map(|(_, entries)| *entries)
}

fn lookup<T: 'static>(table: Keyed<T>, scene_id: &str, role_id: &str) -> Option<&'static [T]> {
    scene_table(table, scene_id).and_then(|roles| role_entry(roles, role_id))
}

/// Opening dialogue seeded when the learner picks `role_id`.
///
/// An unknown scene falls back to the default scene's table. A role missing
/// from the resolved table yields an empty script.
pub fn opening_script(scene_id: &str, role_id: &str) -> &'static [ScriptLine] {
    scene_table(OPENING_SCRIPTS, scene_id)
        .or_else(|| scene_table(OPENING_SCRIPTS, DEFAULT_SCENE_ID))
        .and_then(|roles| role_entry(roles, role_id))
        .unwrap_or(&[])
}

/// Reply pool for exactly `(scene_id, role_id)`, if one exists.
pub fn reply_pool(scene_id: &str, role_id: &str) -> Option<&'static [CannedReply]> {
    lookup(REPLY_POOLS, scene_id, role_id).filter(|pool| !pool.is_empty())
}

/// Quick phrases for the learner's role, or the default list.
pub fn quick_phrases(scene_id: &str, role_id: Option<&str>) -> &'static [&'static str] {
    role_id
        .and_then(|role| lookup(QUICK_PHRASES, scene_id, role))
        .unwrap_or(DEFAULT_QUICK_PHRASES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_script_exact_match() {
        let script = opening_script("taxi", "driver");
        assert_eq!(script.len(), 3);
        assert_eq!(script[0].role, "passenger");
        assert_eq!(script[1].sender, Sender::User);
    }

    #[test]
    fn test_opening_script_unknown_scene_uses_default_table() {
        let script = opening_script("moon_base", "waiter");
        assert_eq!(script, opening_script(DEFAULT_SCENE_ID, "waiter"));
    }

    #[test]
    fn test_opening_script_unknown_role_is_empty() {
        assert!(opening_script("taxi", "mechanic").is_empty());
        assert!(opening_script("moon_base", "astronaut").is_empty());
    }

    #[test]
    fn test_script_line_to_turn() {
        let turn = opening_script("restaurant", "customer")[0].to_turn(1);
        assert_eq!(turn.id, 1);
        assert!(turn.is_ai());
        assert_eq!(turn.role, "waiter");
        assert!(turn.translation.is_some());
    }

    #[test]
    fn test_reply_pool_present_only_for_scripted_scenes() {
        assert_eq!(reply_pool("airport", "passenger").map(|p| p.len()), Some(3));
        assert!(reply_pool("hospital", "patient").is_none());
    }

    #[test]
    fn test_quick_phrases_fallback() {
        assert_eq!(quick_phrases("hospital", Some("nurse")).len(), 5);
        assert_eq!(quick_phrases("hospital", Some("nurse"))[0], "I'm here to take your vital signs.");
        assert_eq!(quick_phrases("hospital", None), DEFAULT_QUICK_PHRASES);
        assert_eq!(quick_phrases("moon_base", Some("nurse")), DEFAULT_QUICK_PHRASES);
    }
}
