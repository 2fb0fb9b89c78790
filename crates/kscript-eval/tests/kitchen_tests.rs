//! End-to-end kitchen runs: recipes, chef rules and order checking.

use kscript_eval::{
    Action, EvalError, FoodItem, Interpreter, Kitchen, KitchenError, Location, Module,
    ModuleKind, Outcome, RunReport, Station,
};
use kscript_lexer::Lexer;
use kscript_parser::Parser;
use kscript_types::ast::Program;
use kscript_types::SourceFile;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> Program {
    let sf = SourceFile::new("test.ks", source);
    let tokens = Lexer::new(&sf).lex();
    let result = Parser::new(tokens, &sf).parse();
    assert!(
        !result.errors.has_errors(),
        "parse errors: {:?}",
        result.errors.errors
    );
    result.program.expect("program")
}

/// One stove with a soup maker called "Soup Pot".
fn soup_kitchen(pantry: &[&str], orders: &[&str]) -> Kitchen {
    let stove = Station::new(
        "Stove",
        vec![Module::new(ModuleKind::SoupMaker, "Soup Pot")],
    )
    .expect("station");
    Kitchen::new(
        vec![stove],
        pantry.iter().copied().collect(),
        orders.iter().map(|o| FoodItem::new(*o)).collect(),
    )
    .expect("kitchen")
}

fn execute(kitchen: Kitchen, source: &str) -> (RunReport, Kitchen) {
    Interpreter::new(kitchen).execute(&parse(source))
}

fn kinds(report: &RunReport) -> Vec<&'static str> {
    report
        .log
        .iter()
        .map(|e| match e.action {
            Action::Move { .. } => "move",
            Action::PickUp { .. } => "pick-up",
            Action::PutDown { .. } => "put-down",
            Action::Use { .. } => "use",
            Action::Success => "success",
            Action::Failure => "failure",
            Action::NoOp => "no-op",
        })
        .collect()
}

const TOMATO_SOUP: &str = r#"var soupmaker = "Soup Pot"
GOTO("Pantry")
var held = GET("Broth")
PLACE(soupmaker, held, 0)
GOTO("Pantry")
held = GET("Tomato")
PLACE(soupmaker, held, 1)
ACTIVATE(soupmaker)
TAKE(soupmaker)
GOTO("Window")
DELIVER()
"#;

// ─────────────────────────────────────────────────────────────────────
// Tomato soup
// ─────────────────────────────────────────────────────────────────────

#[test]
fn tomato_soup_is_delivered() {
    let kitchen = soup_kitchen(&["Broth", "Tomato"], &["Tomato Soup"]);
    let (report, kitchen) = execute(kitchen, TOMATO_SOUP);
    assert_eq!(report.outcome, Outcome::Success);
    assert_eq!(
        kinds(&report),
        vec![
            "move", "pick-up", "put-down", "move", "pick-up", "put-down", "use", "pick-up",
            "move", "put-down", "success"
        ]
    );
    assert_eq!(report.action_count(), 10);
    assert_eq!(kitchen.delivered(), &[FoodItem::new("Tomato Soup")]);
    assert!(kitchen.hands().is_none());
    assert!(kitchen.pantry().is_empty());
}

#[test]
fn tomato_soup_without_delivery_fails() {
    let source = TOMATO_SOUP.replace("DELIVER()\n", "");
    let kitchen = soup_kitchen(&["Broth", "Tomato"], &["Tomato Soup"]);
    let (report, kitchen) = execute(kitchen, &source);
    assert_eq!(report.outcome, Outcome::Failure);
    assert_eq!(report.log.last().map(|e| &e.action), Some(&Action::Failure));
    assert_eq!(kitchen.hands(), Some(&FoodItem::new("Tomato Soup")));
    assert!(kitchen.delivered().is_empty());
    assert_eq!(kitchen.location(), &Location::Window);
}

#[test]
fn log_messages_describe_each_step() {
    let kitchen = soup_kitchen(&["Broth", "Tomato"], &["Tomato Soup"]);
    let (report, _) = execute(kitchen, TOMATO_SOUP);
    let messages: Vec<_> = report.log.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages[0], "Moved to Pantry");
    assert_eq!(messages[1], "Picked up Broth from the Pantry");
    assert_eq!(messages[2], "Placed Broth in slot 0 of Soup Pot");
    assert_eq!(messages[6], "Activated Soup Pot, making Tomato Soup");
    assert_eq!(messages[7], "Took Tomato Soup from Soup Pot");
    assert_eq!(messages[9], "Delivered Tomato Soup");
}

#[test]
fn report_serializes_for_the_frontend() {
    let kitchen = soup_kitchen(&["Broth", "Tomato"], &["Tomato Soup"]);
    let (report, _) = execute(kitchen, TOMATO_SOUP);
    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["outcome"]["status"], "success");
    assert_eq!(json["log"][0]["action"]["kind"], "move");
    assert_eq!(json["log"][0]["action"]["to"]["type"], "pantry");
    assert_eq!(json["log"][6]["action"]["module"], "Soup Pot");
    assert_eq!(json["log"][10]["action"]["kind"], "success");
}

// ─────────────────────────────────────────────────────────────────────
// Recipe rules
// ─────────────────────────────────────────────────────────────────────

#[test]
fn wrong_soup_base_keeps_slots_for_a_retry() {
    let mut kitchen = soup_kitchen(&["Tomato", "Broth", "Broth", "Tomato"], &[]);
    kitchen.get("Tomato").unwrap();
    kitchen.place("Soup Pot", "Tomato", 0).unwrap();
    kitchen.get("Broth").unwrap();
    kitchen.place("Soup Pot", "Broth", 1).unwrap();

    let err = kitchen.activate("Soup Pot").unwrap_err();
    assert_eq!(
        err,
        KitchenError::WrongItem {
            module: "Soup Pot".into(),
            slot: 0,
            expected: "Broth".into()
        }
    );
    let pot = kitchen.module("Soup Pot").unwrap();
    assert_eq!(
        pot.slots(),
        &[Some(FoodItem::new("Tomato")), Some(FoodItem::new("Broth"))]
    );

    kitchen.get("Broth").unwrap();
    kitchen.place("Soup Pot", "Broth", 0).unwrap();
    kitchen.get("Tomato").unwrap();
    kitchen.place("Soup Pot", "Tomato", 1).unwrap();
    assert_eq!(kitchen.activate("Soup Pot").unwrap(), FoodItem::new("Tomato Soup"));
}

#[test]
fn wrong_soup_base_aborts_a_script() {
    let src = "GET(\"Tomato\")\nPLACE(\"Soup Pot\", \"Tomato\", 0)\nGET(\"Broth\")\nPLACE(\"Soup Pot\", \"Broth\", 1)\nACTIVATE(\"Soup Pot\")\n";
    let kitchen = soup_kitchen(&["Tomato", "Broth"], &["Tomato Soup"]);
    let (report, kitchen) = execute(kitchen, src);
    assert!(matches!(
        report.outcome,
        Outcome::Aborted(EvalError::World(KitchenError::WrongItem { slot: 0, .. }))
    ));
    assert_eq!(report.log.len(), 4);
    let pot = kitchen.module("Soup Pot").unwrap();
    assert!(pot.slots().iter().all(Option::is_some));
}

#[test]
fn take_before_activate_yields_none() {
    let src = "GET(\"Broth\")\nPLACE(\"Soup Pot\", \"Broth\", 0)\nPRINT(TAKE(\"Soup Pot\"))\n";
    let kitchen = soup_kitchen(&["Broth"], &[]);
    let (report, kitchen) = execute(kitchen, src);
    assert_eq!(report.outcome, Outcome::Success);
    let last_print = &report.log[report.log.len() - 2];
    assert_eq!(last_print.message, "none");
    assert!(kitchen.hands().is_none());
    assert_eq!(
        kitchen.module("Soup Pot").unwrap().slots()[0],
        Some(FoodItem::new("Broth"))
    );
}

#[test]
fn burger_through_three_modules() {
    let prep = Station::new(
        "Prep",
        vec![
            Module::new(ModuleKind::Slicer, "slicer"),
            Module::new(ModuleKind::Grinder, "grinder"),
        ],
    )
    .unwrap();
    let grill = Station::new("Grill", vec![Module::new(ModuleKind::BurgerBuilder, "builder")])
        .unwrap();
    let kitchen = Kitchen::new(
        vec![prep, grill],
        ["Loaf of Bread", "Loaf of Bread", "Raw Beef", "Cheese"]
            .into_iter()
            .collect(),
        vec![FoodItem::new("Cheese Burger")],
    )
    .unwrap();

    let src = r#"
func process(item, module) {
  GOTO("Pantry")
  GET(item)
  GOTO("Prep")
  PLACE(module, item, 0)
  ACTIVATE(module)
  return TAKE(module)
}

func stack(item, slot) {
  GOTO("Grill")
  PLACE("builder", item, slot)
}

stack(process("Loaf of Bread", "slicer"), 0)
GOTO("Pantry")
stack(GET("Cheese"), 1)
stack(process("Raw Beef", "grinder"), 2)
stack(process("Loaf of Bread", "slicer"), 3)
ACTIVATE("builder")
TAKE("builder")
GOTO("Window")
DELIVER()
"#;
    let (report, kitchen) = execute(kitchen, src);
    assert_eq!(report.outcome, Outcome::Success, "log: {:#?}", report.log);
    assert_eq!(kitchen.delivered(), &[FoodItem::new("Cheese Burger")]);
}

// ─────────────────────────────────────────────────────────────────────
// Chef rules
// ─────────────────────────────────────────────────────────────────────

#[test]
fn get_consumes_stock_until_empty() {
    let kitchen = soup_kitchen(&["Broth", "Broth"], &[]);
    let (report, kitchen) = execute(kitchen, "GET(\"Broth\")\nGET(\"Broth\")\nGET(\"Broth\")\n");
    assert_eq!(
        report.outcome,
        Outcome::Aborted(EvalError::World(KitchenError::OutOfStock("Broth".into())))
    );
    assert_eq!(report.log.len(), 2);
    assert_eq!(kitchen.pantry().count("Broth"), 0);
}

#[test]
fn get_overwrites_held_item() {
    let kitchen = soup_kitchen(&["Broth", "Tomato"], &[]);
    let (_, kitchen) = execute(kitchen, "GET(\"Broth\")\nGET(\"Tomato\")\n");
    assert_eq!(kitchen.hands(), Some(&FoodItem::new("Tomato")));
}

#[test]
fn location_rules() {
    let cases = [
        ("GOTO(\"Window\")\nGET(\"Broth\")\n", "needs the chef at the Pantry"),
        ("GET(\"Broth\")\nDELIVER()\n", "needs the chef at the Window"),
        ("GOTO(\"Window\")\nDELIVER()\n", "not holding anything"),
        ("GOTO(\"Garden\")\n", "no location called 'Garden'"),
        ("ACTIVATE(\"Oven\")\n", "no module called 'Oven'"),
        ("PLACE(\"Soup Pot\", \"Broth\", 0)\n", "not holding anything"),
        ("GET(\"Broth\")\nPLACE(\"Soup Pot\", \"Broth\", 2)\n", "has no slot 2"),
        ("ACTIVATE(\"Stove B\")\n", "empty bay"),
    ];
    for (src, expected) in cases {
        let kitchen = soup_kitchen(&["Broth"], &[]);
        let (report, _) = execute(kitchen, src);
        let err = report.error().unwrap_or_else(|| panic!("{src} should abort"));
        assert!(
            err.to_string().contains(expected),
            "{src}: '{err}' lacks '{expected}'"
        );
    }
}

#[test]
fn builtins_type_check_arguments() {
    let kitchen = soup_kitchen(&[], &[]);
    let (report, _) = execute(kitchen, "GOTO(3)\n");
    assert!(matches!(
        report.outcome,
        Outcome::Aborted(EvalError::TypeError { .. })
    ));
    let kitchen = soup_kitchen(&["Broth"], &[]);
    let (report, _) = execute(kitchen, "GET(\"Broth\")\nPLACE(\"Soup Pot\", \"Broth\", \"0\")\n");
    assert!(matches!(
        report.outcome,
        Outcome::Aborted(EvalError::TypeError { .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────
// Order checking
// ─────────────────────────────────────────────────────────────────────

const DELIVER_A_THEN_B: &str = r#"GET("A")
GOTO("Window")
DELIVER()
GOTO("Pantry")
GET("B")
GOTO("Window")
DELIVER()
"#;

#[test]
fn deliveries_are_compared_in_order() {
    let kitchen = soup_kitchen(&["A", "B"], &["B", "A"]);
    let (report, _) = execute(kitchen, DELIVER_A_THEN_B);
    assert_eq!(report.outcome, Outcome::Failure);

    let kitchen = soup_kitchen(&["A", "B"], &["A", "B"]);
    let (report, _) = execute(kitchen, DELIVER_A_THEN_B);
    assert_eq!(report.outcome, Outcome::Success);
}

#[test]
fn extra_deliveries_fail() {
    let kitchen = soup_kitchen(&["A", "B"], &["A"]);
    let (report, _) = execute(kitchen, DELIVER_A_THEN_B);
    assert_eq!(report.outcome, Outcome::Failure);
    assert!(report.log.last().map(|e| e.message.as_str()).unwrap_or("").contains("[A, B]"));
}
