use crate::model::*;

fn raw(id: Option<&str>, name: Option<&str>) -> RawArtTool {
    RawArtTool {
        id: id.map(String::from),
        art_name: name.map(String::from),
        price: Some(5.0),
        description: Some("Puffy paint for fabric".into()),
        image: Some("https://example.com/a.jpg".into()),
        brand: Some("Arteza".into()),
        limited_time_deal: Some(0.27),
        glass_surface: Some(true),
        feedbacks: None,
    }
}

#[test]
fn test_from_raw_happy_path() {
    let tool = ArtTool::from_raw(raw(Some("1"), Some("3D Fabric Paint"))).unwrap();
    assert_eq!(tool.id, "1");
    assert_eq!(tool.art_name, "3D Fabric Paint");
    assert_eq!(tool.price, 5.0);
    assert_eq!(tool.brand, "Arteza");
    assert!(tool.glass_surface);
    assert!(tool.has_deal());
    assert_eq!(tool.deal_percent(), 27);
    assert!(tool.feedbacks.is_empty());
}

#[test]
fn test_from_raw_missing_id_rejected() {
    assert!(ArtTool::from_raw(raw(None, Some("x"))).is_err());
    assert!(ArtTool::from_raw(raw(Some("  "), Some("x"))).is_err());
}

#[test]
fn test_from_raw_missing_name_rejected() {
    assert!(ArtTool::from_raw(raw(Some("1"), None)).is_err());
}

#[test]
fn test_from_raw_defaults_and_clamps() {
    let mut r = raw(Some("2"), Some("Neon Paint"));
    r.price = Some(-3.0);
    r.limited_time_deal = Some(1.4);
    r.description = None;
    r.brand = None;
    r.glass_surface = None;
    let tool = ArtTool::from_raw(r).unwrap();
    assert_eq!(tool.price, 0.0);
    assert!(tool.limited_time_deal < 1.0);
    assert_eq!(tool.description, "");
    assert_eq!(tool.brand, "");
    assert!(!tool.glass_surface);

    let mut r = raw(Some("3"), Some("Edding 4500"));
    r.price = None;
    r.limited_time_deal = None;
    let tool = ArtTool::from_raw(r).unwrap();
    assert_eq!(tool.price, 0.0);
    assert_eq!(tool.limited_time_deal, 0.0);
    assert!(!tool.has_deal());
}

#[test]
fn test_from_raw_feedback_clamping() {
    let mut r = raw(Some("1"), Some("Paint"));
    r.feedbacks = Some(vec![
        RawFeedback {
            rating: Some(9),
            comment: Some("great".into()),
            author: Some("John".into()),
            date: Some("2023-10-16T17:57:28.556094Z".into()),
        },
        RawFeedback {
            rating: None,
            comment: None,
            author: None,
            date: None,
        },
    ]);
    let tool = ArtTool::from_raw(r).unwrap();
    assert_eq!(tool.feedbacks[0].rating, 5);
    assert_eq!(tool.feedbacks[1].rating, 1);
    assert_eq!(tool.feedbacks[1].comment, "");
}

#[test]
fn test_average_rating() {
    let mut r = raw(Some("1"), Some("Paint"));
    r.feedbacks = Some(vec![
        RawFeedback {
            rating: Some(5),
            comment: Some("a".into()),
            author: Some("x".into()),
            date: None,
        },
        RawFeedback {
            rating: Some(4),
            comment: Some("b".into()),
            author: Some("y".into()),
            date: None,
        },
    ]);
    let tool = ArtTool::from_raw(r).unwrap();
    assert_eq!(tool.average_rating(), 4.5);

    let empty = ArtTool::from_raw(raw(Some("2"), Some("Pens"))).unwrap();
    assert_eq!(empty.average_rating(), 0.0);
}

#[test]
fn test_rating_histogram_ordered_five_to_one() {
    let mut r = raw(Some("1"), Some("Paint"));
    r.feedbacks = Some(vec![
        RawFeedback {
            rating: Some(5),
            comment: None,
            author: None,
            date: None,
        },
        RawFeedback {
            rating: Some(5),
            comment: None,
            author: None,
            date: None,
        },
        RawFeedback {
            rating: Some(2),
            comment: None,
            author: None,
            date: None,
        },
    ]);
    let tool = ArtTool::from_raw(r).unwrap();
    let groups = tool.rating_histogram();
    assert_eq!(groups[0], (5, 2));
    assert_eq!(groups[1], (4, 0));
    assert_eq!(groups[3], (2, 1));
    assert_eq!(groups[4], (1, 0));
}

#[test]
fn test_feedback_date_display() {
    let fb = Feedback {
        rating: 5,
        comment: "ok".into(),
        author: "John".into(),
        date: "2023-10-16T17:57:28.556094Z".into(),
    };
    assert_eq!(fb.date_display(), "2023-10-16");

    let odd = Feedback {
        rating: 3,
        comment: "ok".into(),
        author: "Jane".into(),
        date: "last tuesday".into(),
    };
    assert_eq!(odd.date_display(), "last tuesday");
}

#[test]
fn test_art_tool_camel_case_roundtrip() {
    let json = r#"{
        "id": "3",
        "artName": "Edding 4500 textile marker - set of 10 colors (basic)",
        "price": 29,
        "description": "Textile markers",
        "image": "https://example.com/e.jpg",
        "brand": "Edding",
        "limitedTimeDeal": 0,
        "glassSurface": false,
        "feedbacks": []
    }"#;
    let tool: ArtTool = serde_json::from_str(json).unwrap();
    assert_eq!(tool.id, "3");
    assert_eq!(tool.brand, "Edding");

    let out = serde_json::to_string(&tool).unwrap();
    assert!(out.contains("\"artName\""));
    assert!(out.contains("\"limitedTimeDeal\""));
}

#[test]
fn test_chat_log_append_order() {
    let mut log = ChatLog::new();
    assert!(log.is_empty());
    log.push_user("hello");
    log.push_bot("hi there");
    log.push_user("how much is it?");

    assert_eq!(log.len(), 3);
    assert_eq!(log.messages()[0].sender, Sender::User);
    assert_eq!(log.messages()[1].sender, Sender::Bot);
    assert_eq!(log.last_bot().unwrap().text, "hi there");
}

#[test]
fn test_sender_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
    assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
}
