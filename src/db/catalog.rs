use crate::{
    Conn,
    models::{
        Application, Bundle, Endpoint, EndpointType, EventType, NewApplication, NewBundle,
        NewEndpoint, NewEventType,
    },
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::DbError;

pub async fn create_bundle<'a>(
    conn: &mut Conn<'a>,
    name: &str,
    display_name: &str,
) -> Result<Bundle, DbError> {
    use crate::schema::bundles::dsl::bundles;

    let bundle = diesel::insert_into(bundles)
        .values(NewBundle { name, display_name })
        .returning(Bundle::as_returning())
        .get_result(conn)
        .await?;
    Ok(bundle)
}

pub async fn find_bundle_by_id<'a>(
    conn: &mut Conn<'a>,
    bundle_id: Uuid,
) -> Result<Option<Bundle>, DbError> {
    use crate::schema::bundles::dsl::*;

    let bundle = bundles
        .filter(id.eq(bundle_id))
        .select(Bundle::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(bundle)
}

pub async fn create_application<'a>(
    conn: &mut Conn<'a>,
    bundle_id: Uuid,
    name: &str,
    display_name: &str,
) -> Result<Application, DbError> {
    use crate::schema::applications::dsl::applications;

    let application = diesel::insert_into(applications)
        .values(NewApplication {
            bundle_id,
            name,
            display_name,
        })
        .returning(Application::as_returning())
        .get_result(conn)
        .await?;
    Ok(application)
}

pub async fn create_event_type<'a>(
    conn: &mut Conn<'a>,
    application_id: Uuid,
    name: &str,
    display_name: &str,
    description: Option<&str>,
) -> Result<EventType, DbError> {
    use crate::schema::event_type::dsl::event_type;

    let created = diesel::insert_into(event_type)
        .values(NewEventType {
            application_id,
            name,
            display_name,
            description,
        })
        .returning(EventType::as_returning())
        .get_result(conn)
        .await?;
    Ok(created)
}

pub async fn find_event_type_by_id<'a>(
    conn: &mut Conn<'a>,
    event_type_id: Uuid,
) -> Result<Option<EventType>, DbError> {
    use crate::schema::event_type::dsl::*;

    let found = event_type
        .filter(id.eq(event_type_id))
        .select(EventType::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(found)
}

pub async fn create_endpoint<'a>(
    conn: &mut Conn<'a>,
    account_id: &str,
    endpoint_type: EndpointType,
    name: &str,
) -> Result<Endpoint, DbError> {
    use crate::schema::endpoints::dsl::endpoints;

    let endpoint = diesel::insert_into(endpoints)
        .values(NewEndpoint {
            account_id,
            endpoint_type,
            name,
            enabled: true,
        })
        .returning(Endpoint::as_returning())
        .get_result(conn)
        .await?;
    Ok(endpoint)
}

/// Endpoints are tenant-scoped: another account's endpoint is reported as absent.
pub async fn find_endpoint_by_id<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    endpoint_id: Uuid,
) -> Result<Option<Endpoint>, DbError> {
    use crate::schema::endpoints::dsl::*;

    let endpoint = endpoints
        .filter(id.eq(endpoint_id).and(account_id.eq(account)))
        .select(Endpoint::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(endpoint)
}
