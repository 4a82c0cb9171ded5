use anyhow::Result;
use object_mapper::domain::ports::MemberResult;
use object_mapper::{
    ClassDescriptor, ClassRegistry, MemberError, MethodDescriptor, Object, ObjectMapper,
    ParameterDescriptor, Record, Value,
};
use serde_json::json;
use std::sync::Arc;

/// Hand-written object with typed fields, built through a registry factory.
#[derive(Debug, Default)]
struct Invoice {
    number: String,
    total: f64,
    notes: Vec<String>,
}

impl Invoice {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::builder("Invoice")
            .property("total")
            .private_property("number")
            .constructor(&["number"])
            .method(
                MethodDescriptor::new("addNote")
                    .parameter(ParameterDescriptor::new("note"))
                    .parameter(ParameterDescriptor::new("prefix").with_default(json!(""))),
            )
            .build()
    }

    fn undefined(member: &str) -> MemberError {
        MemberError::Undefined {
            class: "Invoice".to_string(),
            member: member.to_string(),
        }
    }
}

impl Object for Invoice {
    fn class_id(&self) -> &str {
        "Invoice"
    }

    fn property(&self, name: &str) -> MemberResult<Value> {
        match name {
            "total" => Ok(json!(self.total)),
            _ => Err(Self::undefined(name)),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> MemberResult<()> {
        match (name, value.as_f64()) {
            ("total", Some(total)) => {
                self.total = total;
                Ok(())
            }
            ("total", None) => Err(MemberError::Rejected {
                class: "Invoice".to_string(),
                member: "$total".to_string(),
                reason: "expected a number".to_string(),
            }),
            _ => Err(Self::undefined(name)),
        }
    }

    fn read(&self, method: &str) -> MemberResult<Value> {
        Err(Self::undefined(method))
    }

    fn call(&mut self, method: &str, arguments: Vec<Value>) -> MemberResult<Value> {
        match method {
            "addNote" => {
                let prefix = arguments.get(1).and_then(Value::as_str).unwrap_or_default();
                let note = arguments.first().and_then(Value::as_str).unwrap_or_default();
                self.notes.push(format!("{}{}", prefix, note));
                Ok(Value::Null)
            }
            _ => Err(Self::undefined(method)),
        }
    }
}

fn registry() -> Result<Arc<ClassRegistry>> {
    let mut registry = ClassRegistry::new();
    registry.register(
        ClassDescriptor::builder("Order")
            .property("reference")
            .property("amount")
            .property("comment")
            .property("label")
            .getter("getReference", "reference")
            .build(),
    )?;
    registry.register(ClassDescriptor::builder("Bag").overloaded_properties().build())?;
    for (id, intercepts) in [("Ledger", false), ("TaggedLedger", true)] {
        let mut ledger = ClassDescriptor::builder(id)
            .property("amount")
            .private_property("comment")
            .setter("setComment", "comment")
            .getter("getComment", "comment");
        if intercepts {
            ledger = ledger.overloaded_properties().overloaded_methods();
        }
        registry.register(ledger.build())?;
    }
    registry.register(
        ClassDescriptor::builder("Recorder")
            .overloaded_methods()
            .build(),
    )?;
    registry.register_with_factory(Invoice::descriptor(), |_, arguments| {
        let number = arguments
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| MemberError::Rejected {
                class: "Invoice".to_string(),
                member: "__construct()".to_string(),
                reason: "number must be a string".to_string(),
            })?;
        Ok(Box::new(Invoice {
            number: number.to_string(),
            ..Invoice::default()
        }))
    })?;
    Ok(Arc::new(registry))
}

fn order(registry: &ClassRegistry) -> Result<Record> {
    Ok(Record::from_json(
        registry,
        json!({
            "class": "Order",
            "properties": {
                "reference": "INV-7",
                "amount": 12.5,
                "comment": "fragile",
                "label": "urgent: "
            }
        }),
    )?)
}

#[test]
fn test_static_property_to_overloaded_property() -> Result<()> {
    let registry = registry()?;
    let mapper = ObjectMapper::new(Arc::clone(&registry));
    let source = order(&registry)?;

    let map = mapper
        .map_builder()
        .route_builder()
        .set_source_point("#Order::$amount")?
        .set_target_point("~Bag::$amount")?
        .add_route()?
        .map_builder()?
        .get_map(false);

    let bag = mapper
        .map(&source, "Bag", Some(&map))?
        .expect("a bag is built");
    assert_eq!(bag.overloaded_property("amount")?, json!(12.5));
    Ok(())
}

#[test]
fn test_construction_then_methods_then_properties() -> Result<()> {
    let registry = registry()?;
    let mapper = ObjectMapper::new(Arc::clone(&registry));
    let source = order(&registry)?;

    // Routes are declared in reverse of the order they must apply in.
    let map = mapper
        .map_builder()
        .route_builder()
        .set_source_point("#Order::$amount")?
        .set_target_point("#Invoice::$total")?
        .add_route()?
        .set_source_point("#Order::$label")?
        .set_target_point("#Invoice::addNote()::$prefix")?
        .add_route()?
        .set_source_point("#Order::$comment")?
        .set_target_point("#Invoice::addNote()::$note")?
        .add_route()?
        .set_source_point("#Order::getReference()")?
        .set_target_point("#Invoice::__construct()::$number")?
        .add_route()?
        .map_builder()?
        .get_map(false);

    let invoice = mapper
        .map(&source, "Invoice", Some(&map))?
        .expect("an invoice is built");
    let invoice = invoice
        .downcast_ref::<Invoice>()
        .expect("the registry factory builds Invoice values");

    assert_eq!(invoice.number, "INV-7");
    assert_eq!(invoice.total, 12.5);
    assert_eq!(invoice.notes, vec!["urgent: fragile"]);
    Ok(())
}

#[test]
fn test_overloaded_method_receives_arguments_in_route_order() -> Result<()> {
    let registry = registry()?;
    let mapper = ObjectMapper::new(Arc::clone(&registry));
    let source = order(&registry)?;

    let map = mapper
        .map_builder()
        .route_builder()
        .set_source_point("#Order::$reference")?
        .set_target_point("Recorder.log().$reference")?
        .add_route()?
        .set_source_point("#Order::$comment")?
        .set_target_point("Recorder.log().$comment")?
        .add_route()?
        .map_builder()?
        .get_map(false);

    let recorder = mapper
        .map(&source, "Recorder", Some(&map))?
        .expect("a recorder is built");
    let recorder = recorder.downcast_ref::<Record>().expect("record");

    assert_eq!(recorder.calls().len(), 1);
    assert_eq!(recorder.calls()[0].method, "log");
    assert_eq!(recorder.calls()[0].arguments, vec![json!("INV-7"), json!("fragile")]);
    Ok(())
}

#[test]
fn test_missing_required_argument_fails() -> Result<()> {
    let registry = registry()?;
    let mapper = ObjectMapper::new(Arc::clone(&registry));
    let source = order(&registry)?;

    let map = mapper
        .map_builder()
        .route_builder()
        .set_source_point("#Order::$amount")?
        .set_target_point("#Invoice::$total")?
        .add_route()?
        .map_builder()?
        .get_map(false);

    let error = mapper.map(&source, "Invoice", Some(&map)).unwrap_err();
    assert_eq!(
        error.kind(),
        object_mapper::utils::error::ErrorKind::InvalidOperation
    );
    Ok(())
}

#[test]
fn test_rejected_value_surfaces_as_invalid_operation() -> Result<()> {
    let registry = registry()?;
    let mapper = ObjectMapper::new(Arc::clone(&registry));
    let source = order(&registry)?;

    let map = mapper
        .map_builder()
        .route_builder()
        .set_source_point("#Order::$reference")?
        .set_target_point("#Invoice::__construct()::$number")?
        .add_route()?
        .set_source_point("#Order::$comment")?
        .set_target_point("#Invoice::$total")?
        .add_route()?
        .map_builder()?
        .get_map(false);

    let error = mapper.map(&source, "Invoice", Some(&map)).unwrap_err();
    assert!(error.to_string().contains("expected a number"));
    Ok(())
}

#[test]
fn test_dynamic_points_write_declared_members() -> Result<()> {
    let registry = registry()?;
    let mapper = ObjectMapper::new(Arc::clone(&registry));
    let source = order(&registry)?;

    for class_id in ["Ledger", "TaggedLedger"] {
        let map = mapper
            .map_builder()
            .route_builder()
            .set_source_point("#Order::$amount")?
            .set_target_point(&format!("~{}::$amount", class_id))?
            .add_route()?
            .set_source_point("#Order::$comment")?
            .set_target_point(&format!("{}.setComment().$comment", class_id))?
            .add_route()?
            .map_builder()?
            .get_map(false);

        let ledger = mapper
            .map(&source, class_id, Some(&map))?
            .expect("a ledger is built");

        assert_eq!(ledger.property("amount")?, json!(12.5));
        assert_eq!(ledger.read("getComment")?, json!("fragile"));
        let record = ledger.downcast_ref::<Record>().expect("record");
        assert_eq!(record.overloaded("amount"), None);
        assert!(record.calls().is_empty());
    }
    Ok(())
}
