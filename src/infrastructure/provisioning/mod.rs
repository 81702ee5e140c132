mod local_provisioner;
mod mock_provisioner;

pub use local_provisioner::LocalAccountProvisioner;
pub use mock_provisioner::MockAccountProvisioner;
