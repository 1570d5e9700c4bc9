use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anchor resource for fleet-wide actions: registering bikes, flipping
/// bike status, provisioning wallets, listing rides. Rides carry their own
/// ownership rules; everything else is authorized against the platform.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Platform {
    id: Uuid,
}

impl PolarClass for Platform {
    fn get_polar_class_builder() -> oso::ClassBuilder<Platform> {
        oso::Class::builder()
            .name("Platform")
            .add_attribute_getter("id", |recv: &Platform| recv.id.clone())
            .add_class_method("default", Platform::default)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Platform::get_polar_class_builder();
        builder.build()
    }
}
