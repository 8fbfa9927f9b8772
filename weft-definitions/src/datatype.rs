//! Datatype definition sending.

use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sender::DefinitionSender;
use crate::traits::SystemTag;
use weft_models::Datatype;

impl DefinitionSender {
    /// Define a datatype by broadcasting it to the multiparty network.
    ///
    /// Datatypes exist to validate data exchanged with other parties, so
    /// defining one on a non-multiparty node is rejected outright. The
    /// datatype is validated and checked before any identity or transport
    /// work happens.
    ///
    /// Returns the datatype with its assigned id and carrying message.
    pub async fn define_datatype(
        &self,
        mut datatype: Datatype,
        wait_confirm: bool,
    ) -> Result<Datatype> {
        if !self.multiparty {
            return Err(Error::ActionNotSupported);
        }

        datatype.validate()?;
        self.data.check_datatype(&datatype).await?;

        datatype.id = Some(Uuid::new_v4());

        let mut sender = self
            .new_definition_broadcast(SystemTag::DefineDatatype)
            .await?;
        datatype.message = Some(sender.message_id());
        let payload = serde_json::to_value(&datatype)?;
        sender.send(&payload, wait_confirm).await?;

        info!(
            namespace = %datatype.namespace,
            name = %datatype.name,
            version = %datatype.version,
            message = %sender.message_id(),
            "Datatype definition broadcast"
        );
        Ok(datatype)
    }
}
